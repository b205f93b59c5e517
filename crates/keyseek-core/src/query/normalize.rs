use crate::query::node::{Combinator, Group, Node};

///
/// Normalize a sibling list into its canonical shape.
///
/// Rules:
/// - the first sibling of every list carries no combinator
/// - empty groups are dropped
/// - a group with exactly one child is replaced by that child, which takes
///   over the group's combinator
/// - a group whose non-leading children all fold with the group's own
///   combinator is spliced into its parent
///
/// Splicing only happens where the strict left fold yields the same result,
/// so normalization never changes which rows match.
///
#[must_use]
pub fn normalize(nodes: Vec<Node>) -> Vec<Node> {
    let mut out = Vec::with_capacity(nodes.len());

    for node in nodes {
        match node {
            Node::Condition(_) => out.push(node),
            Node::Group(group) => splice_group(group, &mut out),
        }
    }

    if let Some(first) = out.first_mut() {
        first.set_combinator(None);
    }

    out
}

fn splice_group(group: Group, out: &mut Vec<Node>) {
    let Group {
        combinator,
        children,
    } = group;
    let mut children = normalize(children);

    match children.len() {
        0 => {}
        1 => {
            let child = children.remove(0);
            out.push(child.with_combinator(combinator));
        }
        _ if shares_combinator(combinator, &children) => {
            children[0].set_combinator(combinator);
            out.extend(children);
        }
        _ => out.push(Node::Group(Group {
            combinator,
            children,
        })),
    }
}

// Non-leading children fold with the same effective operator as the group.
fn shares_combinator(combinator: Option<Combinator>, children: &[Node]) -> bool {
    let expected = Combinator::effective(combinator);

    children
        .iter()
        .skip(1)
        .all(|child| Combinator::effective(child.combinator()) == expected)
}

///
/// TESTS
///

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::{Condition, Operator};

    fn cond(field: &str) -> Node {
        Condition::new(field, Operator::IsNull).into()
    }

    fn fields(nodes: &[Node]) -> Vec<(String, Option<Combinator>)> {
        nodes
            .iter()
            .map(|node| match node {
                Node::Condition(c) => (c.field.clone(), c.combinator),
                Node::Group(g) => (format!("group[{}]", g.children.len()), g.combinator),
            })
            .collect()
    }

    #[test]
    fn first_sibling_loses_its_combinator() {
        let out = normalize(vec![cond("a").or(), cond("b").and()]);

        assert_eq!(
            fields(&out),
            vec![("a".into(), None), ("b".into(), Some(Combinator::And))]
        );
    }

    #[test]
    fn single_child_group_is_replaced_by_child() {
        let out = normalize(vec![
            cond("a"),
            Node::Group(Group::new(vec![cond("b")])).or(),
        ]);

        assert_eq!(
            fields(&out),
            vec![("a".into(), None), ("b".into(), Some(Combinator::Or))]
        );
    }

    #[test]
    fn uniform_group_is_spliced() {
        let group = Node::Group(Group::new(vec![cond("b"), cond("c").or()])).or();
        let out = normalize(vec![cond("a"), group]);

        assert_eq!(
            fields(&out),
            vec![
                ("a".into(), None),
                ("b".into(), Some(Combinator::Or)),
                ("c".into(), Some(Combinator::Or)),
            ]
        );
    }

    #[test]
    fn mixed_group_is_kept() {
        let group = Node::Group(Group::new(vec![cond("b"), cond("c").or()])).and();
        let out = normalize(vec![cond("a"), group]);

        assert_eq!(
            fields(&out),
            vec![("a".into(), None), ("group[2]".into(), Some(Combinator::And))]
        );
    }

    #[test]
    fn empty_groups_disappear() {
        let out = normalize(vec![
            Node::Group(Group::default()),
            cond("a").or(),
            Node::Group(Group::new(vec![Node::Group(Group::default())])).and(),
        ]);

        assert_eq!(fields(&out), vec![("a".into(), None)]);
    }

    #[test]
    fn nested_group_children_are_normalized() {
        let inner = Node::Group(Group::new(vec![cond("c").or(), cond("d").or()]));
        let group = Node::Group(Group::new(vec![cond("b"), inner.and()])).or();
        let out = normalize(vec![cond("a"), group]);

        let Node::Group(kept) = &out[1] else {
            panic!("mixed group should be kept");
        };
        let Node::Group(inner) = &kept.children[1] else {
            panic!("inner OR group should be kept");
        };
        assert_eq!(inner.children[0].combinator(), None);
    }
}
