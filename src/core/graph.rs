//! Dependency graph analysis for a task batch.
//!
//! Edges point from a task to each of its prerequisites. The graph is built
//! once per request, checked for cycles, and used to count how many tasks
//! each task unlocks. Structural problems become [`Warning`]s; none of them
//! abort the batch.

use crate::core::task::{Task, TaskId};
use crate::core::warning::Warning;
use crate::tlog_debug;
use petgraph::algo::tarjan_scc;
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;
use petgraph::Direction;
use std::collections::{HashMap, HashSet, VecDeque};

/// Directed graph of task ids, task -> prerequisite.
pub struct DependencyGraph {
    graph: DiGraph<TaskId, ()>,
}

/// Cycles found in a [`DependencyGraph`].
#[derive(Debug, Clone, Default)]
pub struct CycleReport {
    /// One path per back edge found by the depth-first search, closed on
    /// its first node (`a -> b -> a`).
    pub cycles: Vec<Vec<TaskId>>,
    /// Every task on some cycle.
    members: HashSet<TaskId>,
    /// Strongly connected component of each node, by node index, for
    /// nodes on a cycle.
    component_of: Vec<Option<usize>>,
}

impl CycleReport {
    fn component(&self, node: NodeIndex) -> Option<usize> {
        self.component_of.get(node.index()).copied().flatten()
    }

    pub fn contains(&self, id: &TaskId) -> bool {
        self.members.contains(id)
    }

    pub fn member_count(&self) -> usize {
        self.members.len()
    }
}

#[derive(Clone, Copy, PartialEq)]
enum Mark {
    Unvisited,
    InProgress,
    Done,
}

impl DependencyGraph {
    /// Build the graph for a batch of tasks with unique ids.
    ///
    /// Dependencies on ids outside the batch, self references, and repeated
    /// entries are dropped, each with a warning.
    pub fn build(tasks: &[Task]) -> (Self, Vec<Warning>) {
        let mut graph = DiGraph::with_capacity(tasks.len(), 0);
        let mut task_index: HashMap<&TaskId, NodeIndex> = HashMap::with_capacity(tasks.len());
        for task in tasks {
            let index = graph.add_node(task.id.clone());
            task_index.insert(&task.id, index);
        }

        let mut warnings = Vec::new();
        for task in tasks {
            let from = task_index[&task.id];
            let mut seen: HashSet<&TaskId> = HashSet::new();
            for dep in &task.dependencies {
                if !seen.insert(dep) {
                    warnings.push(Warning::DuplicateDependency {
                        dependency: dep.clone(),
                        task: task.id.clone(),
                    });
                    continue;
                }
                if dep == &task.id {
                    warnings.push(Warning::SelfDependency {
                        task: task.id.clone(),
                    });
                    continue;
                }
                match task_index.get(dep) {
                    Some(&to) => {
                        graph.add_edge(from, to, ());
                    }
                    None => warnings.push(Warning::UnknownDependency {
                        dependency: dep.clone(),
                        task: task.id.clone(),
                    }),
                }
            }
        }

        (Self { graph }, warnings)
    }

    /// Get the number of tasks in the graph.
    pub fn task_count(&self) -> usize {
        self.graph.node_count()
    }

    /// Get the number of retained dependency edges.
    pub fn dependency_count(&self) -> usize {
        self.graph.edge_count()
    }

    // petgraph yields neighbors newest edge first.
    fn prerequisites(&self, node: NodeIndex) -> Vec<NodeIndex> {
        let mut next: Vec<NodeIndex> = self
            .graph
            .neighbors_directed(node, Direction::Outgoing)
            .collect();
        next.reverse();
        next
    }

    /// Find dependency cycles.
    ///
    /// A depth-first search runs from every unvisited task in batch order.
    /// Reaching a task that is still in progress on the current path records
    /// that stretch of the path as a cycle. Membership is taken from the
    /// strongly connected components, so overlapping loops that share a
    /// back edge are still fully covered.
    pub fn detect_cycles(&self) -> CycleReport {
        let mut marks = vec![Mark::Unvisited; self.graph.node_count()];
        let mut path = Vec::new();
        let mut cycles = Vec::new();
        for node in self.graph.node_indices() {
            if marks[node.index()] == Mark::Unvisited {
                self.visit(node, &mut marks, &mut path, &mut cycles);
            }
        }

        if cycles.is_empty() {
            return CycleReport::default();
        }

        let mut component_of = vec![None; self.graph.node_count()];
        let mut members = HashSet::new();
        for (i, component) in tarjan_scc(&self.graph).into_iter().enumerate() {
            if component.len() < 2 {
                continue;
            }
            for node in component {
                component_of[node.index()] = Some(i);
                members.insert(self.graph[node].clone());
            }
        }

        CycleReport {
            cycles,
            members,
            component_of,
        }
    }

    fn visit(
        &self,
        node: NodeIndex,
        marks: &mut [Mark],
        path: &mut Vec<NodeIndex>,
        cycles: &mut Vec<Vec<TaskId>>,
    ) {
        marks[node.index()] = Mark::InProgress;
        path.push(node);
        for next in self.prerequisites(node) {
            match marks[next.index()] {
                Mark::Unvisited => self.visit(next, marks, path, cycles),
                Mark::InProgress => {
                    if let Some(start) = path.iter().position(|&n| n == next) {
                        let mut cycle: Vec<TaskId> =
                            path[start..].iter().map(|&n| self.graph[n].clone()).collect();
                        cycle.push(self.graph[next].clone());
                        cycles.push(cycle);
                    }
                }
                Mark::Done => {}
            }
        }
        path.pop();
        marks[node.index()] = Mark::Done;
    }

    /// Count, for every task, the tasks that depend on it directly or
    /// transitively.
    ///
    /// For a task on a cycle the walk skips edges inside its own strongly
    /// connected component, so it is never credited for work locked behind
    /// the loop it belongs to. Edges of other loops are followed.
    pub fn unlocks_count(&self, cycles: &CycleReport) -> HashMap<TaskId, usize> {
        self.graph
            .node_indices()
            .map(|node| (self.graph[node].clone(), self.reverse_reach(node, cycles)))
            .collect()
    }

    fn reverse_reach(&self, start: NodeIndex, cycles: &CycleReport) -> usize {
        let own = cycles.component(start);
        let mut seen = vec![false; self.graph.node_count()];
        seen[start.index()] = true;
        let mut queue = VecDeque::from([start]);
        let mut count = 0;
        while let Some(current) = queue.pop_front() {
            for edge in self.graph.edges_directed(current, Direction::Incoming) {
                if own.is_some()
                    && cycles.component(edge.source()) == own
                    && cycles.component(edge.target()) == own
                {
                    continue;
                }
                let dependent = edge.source();
                if !seen[dependent.index()] {
                    seen[dependent.index()] = true;
                    count += 1;
                    queue.push_back(dependent);
                }
            }
        }
        count
    }
}

impl std::fmt::Debug for DependencyGraph {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DependencyGraph")
            .field("tasks", &self.task_count())
            .field("dependencies", &self.dependency_count())
            .finish()
    }
}

/// Everything the scoring engine needs from the graph for one batch.
#[derive(Debug)]
pub struct GraphAnalysis {
    pub cycles: CycleReport,
    pub unlocks: HashMap<TaskId, usize>,
    /// Dangling, duplicate, and self references, then one warning per cycle.
    pub warnings: Vec<Warning>,
}

impl GraphAnalysis {
    pub fn analyze(tasks: &[Task]) -> Self {
        let (graph, mut warnings) = DependencyGraph::build(tasks);
        let cycles = graph.detect_cycles();
        warnings.extend(
            cycles
                .cycles
                .iter()
                .map(|path| Warning::CircularDependency { path: path.clone() }),
        );
        let unlocks = graph.unlocks_count(&cycles);

        tlog_debug!(
            "graph: tasks={} edges={} cycles={} cycle_members={} warnings={}",
            graph.task_count(),
            graph.dependency_count(),
            cycles.cycles.len(),
            cycles.member_count(),
            warnings.len()
        );

        Self {
            cycles,
            unlocks,
            warnings,
        }
    }

    pub fn unlocks_of(&self, id: &TaskId) -> usize {
        self.unlocks.get(id).copied().unwrap_or(0)
    }

    pub fn in_cycle(&self, id: &TaskId) -> bool {
        self.cycles.contains(id)
    }
}
