use std::collections::{BTreeMap, HashSet};

use thiserror::Error;

/// Graph of the entire system, component name to the names it depends on
///
/// Used to compute the start order and to check for missing or circular dependencies.
/// Names are kept sorted so every walk over the graph is reproducible.
#[derive(Debug, Clone, Default)]
pub struct DependencyGraph {
    map: BTreeMap<String, Vec<String>>,
}
impl DependencyGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a component, replacing any previous entry of the same name
    pub fn add(&mut self, name: impl Into<String>, dependencies: Vec<String>) {
        self.map.insert(name.into(), dependencies);
    }

    pub fn contains(&self, name: &str) -> bool {
        self.map.contains_key(name)
    }

    /// Declared dependencies of `name`, in declaration order
    pub fn dependencies_of(&self, name: &str) -> &[String] {
        self.map.get(name).map(Vec::as_slice).unwrap_or_default()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.map.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Orders all components so each one comes after everything it depends on
    ///
    /// Entry points are taken in lexicographic order and dependencies in declaration order,
    /// so the same graph always produces the same order.
    /// Aborts on the first missing or circular dependency.
    pub fn resolve(&self) -> Result<Vec<String>, DependencyGraphError> {
        let mut walk = Walk::new(self, true);
        for name in self.map.keys() {
            if !walk.visit(name) {
                return Err(walk.errors.swap_remove(0));
            }
        }

        Ok(walk.order.into_iter().map(str::to_string).collect())
    }

    /// Validate the graph
    ///
    /// Returns a list of all issues
    pub fn check(&self) -> Result<(), DependencyGraphErrors> {
        let mut walk = Walk::new(self, false);
        for name in self.map.keys() {
            walk.visit(name);
        }

        if !walk.errors.is_empty() {
            return Err(DependencyGraphErrors {
                errors: walk.errors,
            });
        }

        Ok(())
    }
}

/// Depth first walk with three states: unvisited, `in_progress`, `done`
///
/// Iterative DFS over an explicit frame stack, chain depth is bounded by memory only.
struct Walk<'a> {
    graph: &'a DependencyGraph,
    fail_fast: bool,
    done: HashSet<&'a str>,
    in_progress: HashSet<&'a str>,
    /// Components being visited with the index of the next dependency to look at
    stack: Vec<(&'a str, usize)>,
    order: Vec<&'a str>,
    errors: Vec<DependencyGraphError>,
}
impl<'a> Walk<'a> {
    fn new(graph: &'a DependencyGraph, fail_fast: bool) -> Self {
        Self {
            graph,
            fail_fast,
            done: HashSet::new(),
            in_progress: HashSet::new(),
            stack: Vec::new(),
            order: Vec::with_capacity(graph.len()),
            errors: Vec::new(),
        }
    }

    fn enter(&mut self, name: &'a str) {
        self.in_progress.insert(name);
        self.stack.push((name, 0));
    }

    /// Returns false once the walk has to be aborted
    fn visit(&mut self, root: &'a str) -> bool {
        if self.done.contains(root) {
            return true;
        }
        self.enter(root);

        let graph = self.graph;
        while let Some(frame) = self.stack.last_mut() {
            let (name, next) = *frame;
            frame.1 += 1;

            let Some(dependency) = graph.dependencies_of(name).get(next) else {
                // All dependencies are placed, so is this component
                self.stack.pop();
                self.in_progress.remove(name);
                self.done.insert(name);
                self.order.push(name);
                continue;
            };
            let dependency = dependency.as_str();

            if self.done.contains(dependency) {
                continue;
            }

            if !graph.contains(dependency) {
                self.errors.push(DependencyGraphError::InvalidDependency {
                    dependency: dependency.to_string(),
                    required_by: name.to_string(),
                });
                if self.fail_fast {
                    return false;
                }
                continue;
            }

            // Circular Dependency Check
            if self.in_progress.contains(dependency) {
                let position = self
                    .stack
                    .iter()
                    .position(|(entry, _)| *entry == dependency)
                    .unwrap_or_default();
                let mut chain: Vec<String> = self.stack[position..]
                    .iter()
                    .map(|(entry, _)| entry.to_string())
                    .collect();
                chain.push(dependency.to_string()); // Add current so chain is complete

                self.errors.push(DependencyGraphError::CyclicDependency {
                    component: dependency.to_string(),
                    chain,
                });
                if self.fail_fast {
                    return false;
                }
                continue;
            }

            self.enter(dependency);
        }

        true
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DependencyGraphError {
    #[error("'{required_by}' needs '{dependency}' but it is missing")]
    InvalidDependency {
        dependency: String,
        required_by: String,
    },
    #[error("A Circular Dependency exists on '{component}' through {}", .chain.join(" -> "))]
    CyclicDependency {
        component: String,
        chain: Vec<String>,
    },
}
impl std::fmt::Display for DependencyGraphErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut display = Vec::new();
        display.push("The dependency graph had one or more errors:".to_string());
        for error in &self.errors {
            display.push(format!("- {}", error));
        }
        f.write_str(&display.join("\n"))
    }
}

#[derive(Error, Debug, Clone)]
pub struct DependencyGraphErrors {
    pub errors: Vec<DependencyGraphError>,
}
