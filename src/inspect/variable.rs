use super::{
    scope::ScopeKind, stack_trace::FrameTarget, HandleError, Inspection, RESULT_PREVIEW_ROWS,
};
use crate::{
    graph::{GraphItem, ItemKind, ItemRef},
    remote::{Row, Workunit},
    requests::VariablesArguments,
    responses::VariablesResponse,
    types::Variable,
};
use serde_json::Value;
use tracing::error;

#[derive(Clone, Debug)]
pub enum VariablesKey {
    Scope { frame: FrameTarget, kind: ScopeKind },
    Row(Row),
}

impl Inspection {
    /// Resolves a variables handle. Scopes backed by the remote service are fetched once per
    /// request. If that fetch fails, the scope is shown as empty.
    pub async fn variables(
        &mut self,
        args: &VariablesArguments,
        workunit: &dyn Workunit,
    ) -> Result<VariablesResponse, HandleError> {
        let key = self.variables_ids.get(args.variables_reference)?.clone();
        let variables = match key {
            VariablesKey::Scope { frame, kind } => match kind {
                ScopeKind::Local => frame
                    .model
                    .item(&frame.item)
                    .map(attribute_variables)
                    .unwrap_or_default(),
                ScopeKind::Subgraphs => {
                    let parent = match frame.item.kind {
                        ItemKind::Root => None,
                        _ => Some(frame.item.id.as_str()),
                    };
                    let children: Vec<_> = frame
                        .model
                        .subgraphs_of(parent)
                        .map(|it| {
                            (
                                ItemRef::new(ItemKind::Subgraph, it.id.clone()),
                                it.label().to_string(),
                            )
                        })
                        .collect();
                    self.child_variables(&frame, children)
                }
                ScopeKind::Vertices => {
                    let children: Vec<_> = frame
                        .model
                        .vertices_of(&frame.item.id)
                        .map(|it| {
                            (
                                ItemRef::new(ItemKind::Vertex, it.id.clone()),
                                it.label().to_string(),
                            )
                        })
                        .collect();
                    self.child_variables(&frame, children)
                }
                ScopeKind::OutEdges => {
                    let children: Vec<_> = frame
                        .model
                        .out_edges_of(&frame.item.id)
                        .map(|it| {
                            (
                                ItemRef::new(ItemKind::Edge, it.item.id.clone()),
                                it.item.label().to_string(),
                            )
                        })
                        .collect();
                    self.child_variables(&frame, children)
                }
                ScopeKind::WorkunitRoot => workunit
                    .properties()
                    .iter()
                    .map(|(key, value)| variable(key.clone(), value.clone(), 0))
                    .collect(),
                ScopeKind::Breakpoints => match workunit.breakpoints_list().await {
                    Ok(breakpoints) => breakpoints
                        .into_iter()
                        .map(|it| variable(format!("{}_{}", it.action, it.index), it.id, 0))
                        .collect(),
                    Err(error) => {
                        error!("Failed to list the breakpoints: {error}");
                        vec![]
                    }
                },
                ScopeKind::Results => {
                    match workunit
                        .print_rows(&frame.item.id, 0, RESULT_PREVIEW_ROWS)
                        .await
                    {
                        Ok(rows) => rows
                            .into_iter()
                            .take(RESULT_PREVIEW_ROWS)
                            .enumerate()
                            .map(|(index, row)| {
                                let summary = row.summary();
                                let reference = self.variables_ids.create(VariablesKey::Row(row));
                                variable(format!("Row_{index}"), summary, reference.get())
                            })
                            .collect(),
                        Err(error) => {
                            error!("Failed to fetch the rows of `{}`: {error}", frame.item.id);
                            vec![]
                        }
                    }
                }
                // Row details are only reachable through `VariablesKey::Row`.
                ScopeKind::RowDetail => vec![],
            },
            VariablesKey::Row(row) => row
                .0
                .into_iter()
                .map(|(name, value)| variable(name, display_value(&value), 0))
                .collect(),
        };

        let start = args.start.unwrap_or_default();
        let count = args.count.filter(|it| *it > 0).unwrap_or(usize::MAX);
        Ok(VariablesResponse {
            variables: variables.into_iter().skip(start).take(count).collect(),
        })
    }

    /// One variable per child item, expandable into the child's attributes.
    fn child_variables(
        &mut self,
        frame: &FrameTarget,
        children: Vec<(ItemRef, String)>,
    ) -> Vec<Variable> {
        children
            .into_iter()
            .map(|(item, label)| {
                let name = item.id.clone();
                let reference = self.variables_ids.create(VariablesKey::Scope {
                    frame: FrameTarget {
                        model: frame.model.clone(),
                        item,
                    },
                    kind: ScopeKind::Local,
                });
                variable(name, label, reference.get())
            })
            .collect()
    }
}

fn attribute_variables(item: &GraphItem) -> Vec<Variable> {
    item.attributes
        .iter()
        .map(|(key, value)| variable(key.clone(), value.clone(), 0))
        .collect()
}

fn display_value(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}

fn variable(name: String, value: String, variables_reference: usize) -> Variable {
    Variable {
        name,
        value,
        type_field: None,
        presentation_hint: None,
        variables_reference,
        named_variables: None,
    }
}
