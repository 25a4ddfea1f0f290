use super::engine::ComponentSlot;
use super::evaluation_plan::{EvaluationPlan, PlanStats};
use super::id::ComponentId;
use super::link::Link;
use std::cmp::Reverse;
use std::collections::BinaryHeap;

/// Compiles a graph topology into an evaluation plan
pub struct OrderCompiler;

impl OrderCompiler {
    /// Compile the component/link tables into an evaluation plan.
    ///
    /// Uses Kahn's algorithm with a min-heap as the ready set, so whenever
    /// several components are ready the one added to the graph first goes
    /// first. The result depends only on the topology, never on hash order or
    /// on the order links were made.
    ///
    /// # Arguments
    /// * `slots` - All component slots (including tombstoned ones)
    /// * `links` - The link table (`None` for removed links)
    /// * `generation` - Generation counter stamped onto the plan
    pub fn compile(slots: &[ComponentSlot], links: &[Option<Link>], generation: u64) -> EvaluationPlan {
        let start_time = std::time::Instant::now();

        // Sized by every id ever issued, tombstones included
        let n = slots.len();
        let live = |idx: usize| idx < n && !slots[idx].deleted;

        let mut successors: Vec<Vec<usize>> = vec![Vec::new(); n];
        let mut in_degree = vec![0usize; n];
        let mut total_links = 0;

        for link in links.iter().flatten() {
            let from = link.source_component().index();
            let to = link.destination_component().index();

            // Links never outlive their components
            if !live(from) || !live(to) {
                continue;
            }

            successors[from].push(to);
            in_degree[to] += 1;
            total_links += 1;
        }

        let total_components = (0..n).filter(|&i| live(i)).count();
        let root_components = (0..n).filter(|&i| live(i) && in_degree[i] == 0).count();
        let leaf_components = (0..n)
            .filter(|&i| live(i) && successors[i].is_empty())
            .count();

        // Kahn's algorithm, smallest index first
        let mut ready: BinaryHeap<Reverse<usize>> = (0..n)
            .filter(|&i| live(i) && in_degree[i] == 0)
            .map(Reverse)
            .collect();
        let mut order = Vec::with_capacity(total_components);

        while let Some(Reverse(node)) = ready.pop() {
            order.push(ComponentId(node as u32));
            for &next in &successors[node] {
                in_degree[next] -= 1;
                if in_degree[next] == 0 {
                    ready.push(Reverse(next));
                }
            }
        }

        let unscheduled = total_components - order.len();
        if unscheduled > 0 {
            tracing::error!(
                "Graph has a cycle! Only {} of {} components scheduled.",
                order.len(),
                total_components
            );
        }

        let stats = PlanStats {
            total_components,
            total_links,
            root_components,
            leaf_components,
            unscheduled,
            compile_time_us: start_time.elapsed().as_micros() as u64,
        };

        EvaluationPlan {
            order,
            generation,
            stats,
        }
    }
}
