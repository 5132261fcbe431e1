// src/dag/plan.rs

//! Series/parallel task composition.
//!
//! A [`Recipe`] is the user-facing shape of a build (`series(clean, html,
//! parallel(js, font))`); a [`Plan`] is the DAG it lowers to. Every step of a
//! series depends on every tail of the step before it; members of a parallel
//! group share predecessors and successors but not each other.

use petgraph::Direction;
use petgraph::algo::toposort;
use petgraph::graphmap::DiGraphMap;

use crate::config::model::RecipeEntry;
use crate::errors::{AssetflowError, Result};
use crate::pipeline::TaskKind;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Recipe {
    Task(TaskKind),
    Series(Vec<Recipe>),
    Parallel(Vec<Recipe>),
}

impl Recipe {
    pub fn series(kinds: impl IntoIterator<Item = TaskKind>) -> Recipe {
        Recipe::Series(kinds.into_iter().map(Recipe::Task).collect())
    }

    /// Lower `[build]` entries from the config file into a recipe.
    pub fn from_entries(entries: &[RecipeEntry]) -> Result<Recipe> {
        let mut items = Vec::with_capacity(entries.len());
        for entry in entries {
            let item = match entry {
                RecipeEntry::Task(name) => Recipe::Task(resolve(name)?),
                RecipeEntry::Parallel(names) => Recipe::Parallel(
                    names
                        .iter()
                        .map(|n| resolve(n).map(Recipe::Task))
                        .collect::<Result<Vec<_>>>()?,
                ),
            };
            items.push(item);
        }
        Ok(Recipe::Series(items))
    }
}

fn resolve(name: &str) -> Result<TaskKind> {
    TaskKind::from_name(name).ok_or_else(|| AssetflowError::TaskNotFound(name.to_string()))
}

/// A named, validated DAG of task steps.
#[derive(Debug, Clone)]
pub struct Plan {
    name: String,
    graph: DiGraphMap<TaskKind, ()>,
    order: Vec<TaskKind>,
}

impl Plan {
    /// Build the plan for `recipe`, rejecting recipes whose ordering cannot
    /// be satisfied (a task listed twice in sequence).
    pub fn from_recipe(name: impl Into<String>, recipe: &Recipe) -> Result<Plan> {
        let name = name.into();
        let mut graph: DiGraphMap<TaskKind, ()> = DiGraphMap::new();
        lower(recipe, &mut graph);

        match toposort(&graph, None) {
            Ok(order) => Ok(Plan { name, graph, order }),
            Err(cycle) => Err(AssetflowError::DagCycle(format!(
                "plan '{}' orders task '{}' both before and after another step",
                name,
                cycle.node_id()
            ))),
        }
    }

    /// A plan with no ordering between its tasks. Used for watch mode, where
    /// each trigger runs exactly the matching task.
    pub fn flat(name: impl Into<String>, kinds: &[TaskKind]) -> Plan {
        let mut graph: DiGraphMap<TaskKind, ()> = DiGraphMap::new();
        for kind in kinds {
            graph.add_node(*kind);
        }
        Plan {
            name: name.into(),
            graph,
            order: kinds.to_vec(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Tasks in a valid execution order.
    pub fn tasks(&self) -> &[TaskKind] {
        &self.order
    }

    pub fn contains(&self, kind: TaskKind) -> bool {
        self.graph.contains_node(kind)
    }

    /// Direct predecessors of `kind`.
    pub fn dependencies_of(&self, kind: TaskKind) -> Vec<TaskKind> {
        let mut deps: Vec<TaskKind> = self
            .graph
            .neighbors_directed(kind, Direction::Incoming)
            .collect();
        deps.sort();
        deps
    }

    /// Direct successors of `kind`.
    pub fn dependents_of(&self, kind: TaskKind) -> Vec<TaskKind> {
        let mut next: Vec<TaskKind> = self
            .graph
            .neighbors_directed(kind, Direction::Outgoing)
            .collect();
        next.sort();
        next
    }

    /// Tasks without predecessors; triggering these runs the whole plan.
    pub fn roots(&self) -> Vec<TaskKind> {
        self.order
            .iter()
            .copied()
            .filter(|k| {
                self.graph
                    .neighbors_directed(*k, Direction::Incoming)
                    .next()
                    .is_none()
            })
            .collect()
    }
}

/// Add `recipe` to `graph`, returning its (heads, tails).
fn lower(recipe: &Recipe, graph: &mut DiGraphMap<TaskKind, ()>) -> (Vec<TaskKind>, Vec<TaskKind>) {
    match recipe {
        Recipe::Task(kind) => {
            graph.add_node(*kind);
            (vec![*kind], vec![*kind])
        }
        Recipe::Series(items) => {
            let mut heads: Vec<TaskKind> = Vec::new();
            let mut tails: Vec<TaskKind> = Vec::new();
            for item in items {
                let (item_heads, item_tails) = lower(item, graph);
                if item_heads.is_empty() {
                    continue;
                }
                if tails.is_empty() {
                    heads = item_heads.clone();
                } else {
                    for from in &tails {
                        for to in &item_heads {
                            graph.add_edge(*from, *to, ());
                        }
                    }
                }
                tails = item_tails;
            }
            (heads, tails)
        }
        Recipe::Parallel(items) => {
            let mut heads = Vec::new();
            let mut tails = Vec::new();
            for item in items {
                let (h, t) = lower(item, graph);
                heads.extend(h);
                tails.extend(t);
            }
            heads.dedup();
            tails.dedup();
            (heads, tails)
        }
    }
}
