//! Sub-recipe reference graph
//!
//! Builds forward and reverse reference edges for impact analysis and
//! cycle detection.

use std::collections::{BTreeMap, BTreeSet, HashSet, VecDeque};

use crate::catalog::RecipeCatalog;

/// Recipe identifier
pub type RecipeId = String;

/// Reference graph with forward and reverse edges
#[derive(Debug, Clone, Default)]
pub struct RecipeGraph {
    /// Forward edges: recipe -> sub-recipes it uses
    uses: BTreeMap<RecipeId, Vec<RecipeId>>,

    /// Reverse edges: sub-recipe -> recipes that use it
    used_by: BTreeMap<RecipeId, Vec<RecipeId>>,

    /// All recipes in the graph, dangling references included
    nodes: BTreeSet<RecipeId>,
}

impl RecipeGraph {
    /// Build the graph from a recipe catalog
    pub fn from_catalog(recipes: &RecipeCatalog) -> Self {
        let mut graph = Self::default();

        for recipe in recipes.iter() {
            graph.nodes.insert(recipe.id.clone());

            let mut seen = HashSet::new();
            for sub_id in recipe.sub_recipe_ids() {
                // A sub-recipe used on two lines is still one edge
                if !seen.insert(sub_id) {
                    continue;
                }

                graph.nodes.insert(sub_id.to_string());
                graph
                    .uses
                    .entry(recipe.id.clone())
                    .or_default()
                    .push(sub_id.to_string());
                graph
                    .used_by
                    .entry(sub_id.to_string())
                    .or_default()
                    .push(recipe.id.clone());
            }
        }

        graph
    }

    /// Get all nodes in the graph
    pub fn all_nodes(&self) -> Vec<&RecipeId> {
        self.nodes.iter().collect()
    }

    /// Get immediate sub-recipes of a recipe
    pub fn sub_recipes(&self, recipe_id: &str) -> Vec<&RecipeId> {
        self.uses
            .get(recipe_id)
            .map(|ids| ids.iter().collect())
            .unwrap_or_default()
    }

    /// Get recipes that use this one directly
    pub fn dependents(&self, recipe_id: &str) -> Vec<&RecipeId> {
        self.used_by
            .get(recipe_id)
            .map(|ids| ids.iter().collect())
            .unwrap_or_default()
    }

    /// Get all recipes whose cost changes when this one changes
    /// (transitive closure of dependents)
    pub fn downstream(&self, recipe_id: &str) -> Vec<RecipeId> {
        Self::closure(&self.used_by, recipe_id)
    }

    /// Get all sub-recipes this one draws from, directly or not
    pub fn upstream(&self, recipe_id: &str) -> Vec<RecipeId> {
        Self::closure(&self.uses, recipe_id)
    }

    /// Breadth-first walk over one edge direction
    fn closure(edges: &BTreeMap<RecipeId, Vec<RecipeId>>, start: &str) -> Vec<RecipeId> {
        let mut visited = HashSet::new();
        let mut queue = VecDeque::new();
        let mut result = Vec::new();

        if let Some(next) = edges.get(start) {
            queue.extend(next.iter().cloned());
        }

        while let Some(current) = queue.pop_front() {
            if !visited.insert(current.clone()) {
                continue;
            }

            if let Some(next) = edges.get(&current) {
                for id in next {
                    if !visited.contains(id) {
                        queue.push_back(id.clone());
                    }
                }
            }

            result.push(current);
        }

        result
    }

    /// Check if `source` reaches `target` by following dependents
    pub fn has_path(&self, source: &str, target: &str) -> bool {
        self.downstream(source).iter().any(|id| id == target)
    }

    /// Whether letting `parent` use `child` as a sub-recipe would close a loop
    pub fn would_create_cycle(&self, parent: &str, child: &str) -> bool {
        parent == child || self.upstream(child).iter().any(|id| id == parent)
    }

    /// Topological order, sub-recipes before the recipes using them.
    /// Returns `None` when the graph has a cycle.
    pub fn topological_sort(&self) -> Option<Vec<RecipeId>> {
        let mut in_degree: BTreeMap<&str, usize> = self
            .nodes
            .iter()
            .map(|id| (id.as_str(), self.uses.get(id).map_or(0, Vec::len)))
            .collect();

        let mut queue: VecDeque<&str> = in_degree
            .iter()
            .filter(|(_, &degree)| degree == 0)
            .map(|(&id, _)| id)
            .collect();

        let mut result = Vec::new();

        // Kahn's algorithm
        while let Some(id) = queue.pop_front() {
            result.push(id.to_string());

            if let Some(dependents) = self.used_by.get(id) {
                for dependent in dependents {
                    if let Some(degree) = in_degree.get_mut(dependent.as_str()) {
                        *degree -= 1;
                        if *degree == 0 {
                            queue.push_back(dependent.as_str());
                        }
                    }
                }
            }
        }

        if result.len() == self.nodes.len() {
            Some(result)
        } else {
            None
        }
    }

    /// Every elementary cycle, each as a chain that starts and ends on the
    /// same id (e.g. `["A", "B", "A"]`).
    ///
    /// Each cycle is reported once, starting from its smallest id. Cycles
    /// sharing recipes are all listed.
    pub fn find_cycles(&self) -> Vec<Vec<RecipeId>> {
        let mut cycles = Vec::new();

        for start in &self.nodes {
            let mut path = vec![start.as_str()];
            let mut on_path: HashSet<&str> = HashSet::new();
            on_path.insert(start.as_str());

            self.walk_cycles(start, start, &mut path, &mut on_path, &mut cycles);
        }

        cycles
    }

    /// Depth-first walk over ids greater than `start`, closing a cycle
    /// whenever an edge leads back to `start`
    fn walk_cycles<'g>(
        &'g self,
        start: &str,
        node: &str,
        path: &mut Vec<&'g str>,
        on_path: &mut HashSet<&'g str>,
        cycles: &mut Vec<Vec<RecipeId>>,
    ) {
        let Some(next) = self.uses.get(node) else {
            return;
        };

        for child in next {
            let child = child.as_str();

            if child == start {
                let mut chain: Vec<RecipeId> = path.iter().map(|id| id.to_string()).collect();
                chain.push(start.to_string());
                cycles.push(chain);
            } else if child > start && !on_path.contains(child) {
                path.push(child);
                on_path.insert(child);

                self.walk_cycles(start, child, path, on_path, cycles);

                path.pop();
                on_path.remove(child);
            }
        }
    }
}
