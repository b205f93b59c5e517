use crate::{
    compile::{
        coerce::{Coercer, coerce_text},
        pattern::{LIKE_ESCAPE, PatternShape, like_pattern},
    },
    error::{Error, OperationError, ParseError},
    model::{Metamodel, ScalarType},
    query::{Combinator, Condition, Literal, Node, Operator, OperatorFamily},
    schema::FieldResolver,
    store::{CompareOp, Expr},
    value::Value,
};

///
/// PredicateCompiler
///
/// Translates a filter tree into a single native predicate for one query
/// root. Pure with respect to its inputs: compiling the same tree twice
/// yields equal expressions.
///

pub struct PredicateCompiler<'a> {
    metamodel: &'a Metamodel,
    entity: &'a str,
    resolver: &'a dyn FieldResolver,
    coercer: Coercer<'a>,
}

impl<'a> PredicateCompiler<'a> {
    #[must_use]
    pub fn new(
        metamodel: &'a Metamodel,
        entity: &'a str,
        resolver: &'a dyn FieldResolver,
        coercer: Coercer<'a>,
    ) -> Self {
        Self {
            metamodel,
            entity,
            resolver,
            coercer,
        }
    }

    /// Compile one node. `None` means the node constrains nothing (an
    /// empty group); callers skip it.
    pub fn compile(&self, node: &Node) -> Result<Option<Expr>, Error> {
        match node {
            Node::Condition(condition) => self.compile_condition(condition).map(Some),
            Node::Group(group) => self.compile_all(&group.children),
        }
    }

    /// Strict left fold over siblings: each compiled sibling is combined
    /// with the accumulator using its own combinator tag.
    pub fn compile_all(&self, nodes: &[Node]) -> Result<Option<Expr>, Error> {
        let mut acc: Option<Expr> = None;

        for node in nodes {
            let Some(expr) = self.compile(node)? else {
                continue;
            };

            acc = Some(match acc {
                None => expr,
                Some(prev) => match Combinator::effective(node.combinator()) {
                    Combinator::And => prev.and(expr),
                    Combinator::Or => prev.or(expr),
                },
            });
        }

        Ok(acc)
    }

    fn compile_condition(&self, condition: &Condition) -> Result<Expr, Error> {
        let path = match &condition.path {
            Some(path) => path.clone(),
            None => self.resolver.resolve(&condition.field)?,
        };
        let ty = self.metamodel.resolve_path(self.entity, &path)?.leaf;
        let op = condition.operator;

        let expr = match op.family() {
            OperatorFamily::Null => {
                if let Some(value) = condition.primary().or_else(|| condition.secondary()) {
                    return Err(OperationError::UnexpectedValue {
                        field: condition.field.clone(),
                        operator: op,
                        value: value.to_string(),
                    }
                    .into());
                }

                if op == Operator::IsNull {
                    Expr::is_null(path)
                } else {
                    Expr::is_not_null(path)
                }
            }

            OperatorFamily::Equality => {
                let value = self.coerce(condition, required(condition)?, &ty)?;
                let cmp = if op == Operator::Equals {
                    CompareOp::Eq
                } else {
                    CompareOp::Ne
                };

                Expr::compare(path, cmp, value)
            }

            OperatorFamily::Ordering => {
                require_ordering(condition, &ty)?;
                let value = self.coerce(condition, required(condition)?, &ty)?;
                let cmp = match op {
                    Operator::GreaterThan => CompareOp::Gt,
                    Operator::GreaterEqualThan => CompareOp::Ge,
                    Operator::LessThan => CompareOp::Lt,
                    _ => CompareOp::Le,
                };

                Expr::compare(path, cmp, value)
            }

            OperatorFamily::Range => {
                require_ordering(condition, &ty)?;
                let (low, high) = range_bounds(condition)?;
                let between = Expr::between(
                    path,
                    self.coerce(condition, low, &ty)?,
                    self.coerce(condition, high, &ty)?,
                );

                if op.is_negated() { !between } else { between }
            }

            OperatorFamily::Pattern => {
                if !ty.is_textual() {
                    return Err(OperationError::NotTextual {
                        field: condition.field.clone(),
                        operator: op,
                        ty: ty.name(),
                    }
                    .into());
                }
                let literal = required(condition)?;
                let text =
                    coerce_text(literal).map_err(|err| coercion_error(condition, literal, err))?;
                let shape = match op {
                    Operator::Contains | Operator::NotContains => PatternShape::Contains,
                    Operator::StartsWith | Operator::NotStartsWith => PatternShape::StartsWith,
                    _ => PatternShape::EndsWith,
                };
                let like = Expr::like_ci(path, like_pattern(&text, shape), LIKE_ESCAPE);

                if op.is_negated() { !like } else { like }
            }

            OperatorFamily::Membership => {
                let literal = required(condition)?;
                let Literal::Array(items) = literal else {
                    return Err(OperationError::NotACollection {
                        field: condition.field.clone(),
                        operator: op,
                        value: literal.to_string(),
                    }
                    .into());
                };
                if items.is_empty() {
                    return Err(OperationError::EmptyCollection {
                        field: condition.field.clone(),
                        operator: op,
                    }
                    .into());
                }

                let values = items
                    .iter()
                    .map(|item| self.coerce(condition, item, &ty))
                    .collect::<Result<Vec<Value>, _>>()?;
                let membership = Expr::in_list(path, values);

                if op.is_negated() { !membership } else { membership }
            }
        };

        Ok(expr)
    }

    fn coerce(
        &self,
        condition: &Condition,
        literal: &Literal,
        ty: &ScalarType,
    ) -> Result<Value, OperationError> {
        self.coercer
            .coerce(literal, ty)
            .map_err(|err| coercion_error(condition, literal, err))
    }
}

fn coercion_error(condition: &Condition, literal: &Literal, source: ParseError) -> OperationError {
    OperationError::Coercion {
        field: condition.field.clone(),
        operator: condition.operator,
        value: literal.to_string(),
        source,
    }
}

fn required(condition: &Condition) -> Result<&Literal, OperationError> {
    condition
        .primary()
        .ok_or_else(|| OperationError::MissingValue {
            field: condition.field.clone(),
            operator: condition.operator,
        })
}

fn require_ordering(condition: &Condition, ty: &ScalarType) -> Result<(), OperationError> {
    if ty.supports_ordering() {
        Ok(())
    } else {
        Err(OperationError::Unorderable {
            field: condition.field.clone(),
            operator: condition.operator,
            ty: ty.name(),
        })
    }
}

/// Bounds from `value`/`value_to`, or from a two-element array in `value`.
fn range_bounds(condition: &Condition) -> Result<(&Literal, &Literal), OperationError> {
    let arity = || OperationError::RangeArity {
        field: condition.field.clone(),
        operator: condition.operator,
        value: condition
            .value
            .as_ref()
            .map_or_else(|| "nothing".to_string(), ToString::to_string),
    };

    match (condition.primary(), condition.secondary()) {
        (Some(Literal::Array(bounds)), None) => match bounds.as_slice() {
            [low, high] if !low.is_null() && !high.is_null() => Ok((low, high)),
            _ => Err(arity()),
        },
        (Some(low), Some(high)) if !low.is_array() => Ok((low, high)),
        _ => Err(arity()),
    }
}
