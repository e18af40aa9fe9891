//! Target graph and dependency-ordered scheduler.
//!
//! Targets are named units of work with declared upstream dependencies, an
//! optional skip predicate, and an action. Executing a target runs the
//! transitive closure of its dependencies before the target itself, each
//! node exactly once per run (diamond dependencies collapse). Resolution is
//! a depth-first walk with separate in-progress and done sets, so a cycle is
//! reported before any action has run. Skip predicates are stored as
//! closures and evaluated immediately before the action would run, because
//! they may depend on filesystem state produced by earlier dependency
//! actions.

use std::collections::HashMap;

use petgraph::Direction;
use petgraph::graph::{DiGraph, NodeIndex};
use tracing::{debug, info};

use crate::error::{BuildError, Result};

type Action = Box<dyn Fn() -> Result<()>>;
type SkipPredicate = Box<dyn Fn() -> bool>;

struct Target {
  name: String,
  deps: Vec<String>,
  skip: Option<SkipPredicate>,
  action: Action,
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Visit {
  InProgress,
  Done,
}

/// Registry and scheduler for named build targets.
pub struct TargetGraph {
  graph: DiGraph<Target, ()>,
  index: HashMap<String, NodeIndex>,
  linked: bool,
}

impl TargetGraph {
  pub fn new() -> Self {
    Self {
      graph: DiGraph::new(),
      index: HashMap::new(),
      linked: false,
    }
  }

  /// Register a target.
  pub fn target(
    &mut self,
    name: &str,
    deps: &[&str],
    action: impl Fn() -> Result<()> + 'static,
  ) -> &mut Self {
    self.insert(name, deps, None, Box::new(action))
  }

  /// Register a target with a skip predicate ("skip if true"), evaluated at
  /// execution time rather than now.
  pub fn target_if(
    &mut self,
    name: &str,
    deps: &[&str],
    skip: impl Fn() -> bool + 'static,
    action: impl Fn() -> Result<()> + 'static,
  ) -> &mut Self {
    self.insert(name, deps, Some(Box::new(skip)), Box::new(action))
  }

  fn insert(&mut self, name: &str, deps: &[&str], skip: Option<SkipPredicate>, action: Action) -> &mut Self {
    assert!(!self.index.contains_key(name), "duplicate target '{}'", name);
    let idx = self.graph.add_node(Target {
      name: name.to_string(),
      deps: deps.iter().map(|d| d.to_string()).collect(),
      skip,
      action,
    });
    self.index.insert(name.to_string(), idx);
    self
  }

  pub fn contains(&self, name: &str) -> bool {
    self.index.contains_key(name)
  }

  /// Names of all registered targets, in registration order.
  pub fn target_names(&self) -> Vec<&str> {
    self.graph.node_weights().map(|t| t.name.as_str()).collect()
  }

  /// Run `name` after all of its transitive dependencies, each exactly once.
  ///
  /// The schedule is resolved up front without side effects; a dependency
  /// cycle or an unknown dependency therefore aborts before any action has
  /// run. The first failing action aborts the run with no rollback: re-running
  /// is cheap because completed library steps are sentinel-guarded.
  pub fn execute(&mut self, name: &str) -> Result<()> {
    let start = *self
      .index
      .get(name)
      .ok_or_else(|| BuildError::UnknownTarget { name: name.to_string() })?;

    self.link()?;
    let schedule = self.resolve_order(start)?;
    debug!(target = name, steps = schedule.len(), "schedule resolved");

    for idx in schedule {
      let target = &self.graph[idx];
      if let Some(skip) = &target.skip
        && skip()
      {
        info!(target = %target.name, "skipped");
        continue;
      }
      debug!(target = %target.name, "starting");
      (target.action)()?;
      info!(target = %target.name, "done");
    }

    Ok(())
  }

  /// Materialize dependency edges (dependency → dependent), once.
  fn link(&mut self) -> Result<()> {
    if self.linked {
      return Ok(());
    }
    let mut edges = Vec::new();
    for idx in self.graph.node_indices() {
      for dep in &self.graph[idx].deps {
        let dep_idx = self
          .index
          .get(dep)
          .ok_or_else(|| BuildError::UnknownTarget { name: dep.clone() })?;
        edges.push((*dep_idx, idx));
      }
    }
    for (from, to) in edges {
      self.graph.add_edge(from, to, ());
    }
    self.linked = true;
    Ok(())
  }

  /// Depth-first postorder over the dependency closure of `start`.
  fn resolve_order(&self, start: NodeIndex) -> Result<Vec<NodeIndex>> {
    let mut state = HashMap::new();
    let mut schedule = Vec::new();
    self.visit(start, &mut state, &mut schedule)?;
    Ok(schedule)
  }

  fn visit(
    &self,
    idx: NodeIndex,
    state: &mut HashMap<NodeIndex, Visit>,
    schedule: &mut Vec<NodeIndex>,
  ) -> Result<()> {
    match state.get(&idx) {
      Some(Visit::Done) => return Ok(()),
      Some(Visit::InProgress) => {
        // Reached again while still on the current traversal path.
        return Err(BuildError::DependencyCycle {
          target: self.graph[idx].name.clone(),
        });
      }
      None => {}
    }

    state.insert(idx, Visit::InProgress);

    // petgraph yields the most recently added edge first; reverse to keep
    // declaration order among siblings.
    let deps: Vec<NodeIndex> = self.graph.neighbors_directed(idx, Direction::Incoming).collect();
    for dep in deps.into_iter().rev() {
      self.visit(dep, state, schedule)?;
    }

    state.insert(idx, Visit::Done);
    schedule.push(idx);
    Ok(())
  }
}

impl Default for TargetGraph {
  fn default() -> Self {
    Self::new()
  }
}
