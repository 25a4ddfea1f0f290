//! Graph engine: ownership, connection rules and the tick pass.
//!
//! The graph owns every component slot and every link. All mutation goes
//! through `&mut self`, so an edit can never interleave with a tick. Each tick:
//! 1. Recompile the evaluation plan if the topology changed.
//! 2. For each component in plan order, pull driven parameters through their links.
//! 3. Evaluate the component into a scratch buffer.
//! 4. Publish the outputs, or the fallback value if evaluation failed.

use crate::config::{EngineSettings, ReconnectPolicy};
use crate::graph::compiler::OrderCompiler;
use crate::graph::component::{AnyComponent, EvalContext};
use crate::graph::component_kind::{ComponentFactory, ComponentKind};
use crate::graph::error::{EvalError, GraphError, GraphResult};
use crate::graph::evaluation_plan::EvaluationPlan;
use crate::graph::id::{ComponentId, LinkId, PinId};
use crate::graph::link::{Link, LinkEnd};
use crate::graph::parameter::ComponentParameter;
use crate::graph::pin::{InputPin, OutputPin, PinRole};

/// A slot holding a component and the runtime state of its pins.
pub struct ComponentSlot {
    pub(crate) component: AnyComponent,
    pub(crate) parameters: Vec<ComponentParameter>,
    pub(crate) outputs: Vec<OutputPin>,
    /// Error from the most recent failed evaluation, cleared on success.
    pub(crate) last_error: Option<EvalError>,
    /// Whether this component has been removed (slot is a tombstone).
    pub(crate) deleted: bool,
}

impl ComponentSlot {
    pub fn new(component: AnyComponent) -> Self {
        let mut parameters = Vec::new();
        let mut outputs = Vec::new();
        for pin in component.pins() {
            match pin.role {
                PinRole::Input => parameters.push(ComponentParameter::new(pin.name, pin.default)),
                PinRole::Output => outputs.push(OutputPin::new(pin.name)),
            }
        }
        Self {
            component,
            parameters,
            outputs,
            last_error: None,
            deleted: false,
        }
    }

    pub fn component(&self) -> &AnyComponent {
        &self.component
    }

    pub fn name(&self) -> &str {
        self.component.name()
    }

    pub fn kind(&self) -> Option<ComponentKind> {
        self.component.kind()
    }

    /// Parameters in input pin order.
    pub fn parameters(&self) -> &[ComponentParameter] {
        &self.parameters
    }

    /// Input pins in order (one per parameter).
    pub fn inputs(&self) -> impl Iterator<Item = &InputPin> + '_ {
        self.parameters.iter().map(|p| p.pin())
    }

    pub fn outputs(&self) -> &[OutputPin] {
        &self.outputs
    }

    pub fn last_error(&self) -> Option<&EvalError> {
        self.last_error.as_ref()
    }

    /// Every link touching one of this component's pins.
    fn incident_links(&self) -> Vec<LinkId> {
        self.parameters
            .iter()
            .filter_map(|p| p.pin.link)
            .chain(self.outputs.iter().flat_map(|o| o.links.iter().copied()))
            .collect()
    }
}

/// Outcome of one tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickStats {
    /// Components evaluated this tick.
    pub evaluated: usize,
    /// Components whose evaluation failed and published the fallback value.
    pub failed: usize,
}

/// The component graph and its evaluator.
pub struct Graph {
    /// Slots indexed by `ComponentId`. Removed components stay as tombstones,
    /// so the table (and every walk over it) grows with all ids ever issued.
    components: Vec<ComponentSlot>,
    /// Link table indexed by `LinkId`. Removed links leave `None` and are
    /// never compacted; cycle checks and recompiles scan every entry.
    links: Vec<Option<Link>>,
    /// Component ids available before `add_component` refuses.
    max_components: usize,
    /// Cached evaluation plan
    plan: EvaluationPlan,
    /// Whether the plan needs recompilation
    plan_dirty: bool,
    /// Generation counter, bumped on every topology change
    generation: u64,
    settings: EngineSettings,
    factory: ComponentFactory,
    tick: u64,
    input_scratch: Vec<f64>,
    output_scratch: Vec<f64>,
}

impl std::fmt::Debug for Graph {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Graph")
            .field("components", &self.components.len())
            .field("links", &self.links.len())
            .field("generation", &self.generation)
            .field("tick", &self.tick)
            .finish_non_exhaustive()
    }
}

impl Graph {
    /// Create an empty graph. `settings` are taken as given; callers holding
    /// untrusted settings should run [`EngineSettings::validate`] first, as
    /// `from_patch` and the config loader do.
    pub fn new(settings: EngineSettings) -> Self {
        Self {
            components: Vec::new(),
            links: Vec::new(),
            max_components: ComponentId::MAX_COUNT,
            plan: EvaluationPlan::new(),
            plan_dirty: true,
            generation: 0,
            factory: ComponentFactory::new(settings.scope_capacity),
            settings,
            tick: 0,
            input_scratch: Vec::new(),
            output_scratch: Vec::new(),
        }
    }

    pub fn settings(&self) -> &EngineSettings {
        &self.settings
    }

    pub fn reconnect_policy(&self) -> ReconnectPolicy {
        self.settings.reconnect_policy
    }

    /// Topology generation. Changes whenever a component or link is added,
    /// removed or re-pointed.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Number of ticks run since creation or the last `reset`.
    pub fn tick_count(&self) -> u64 {
        self.tick
    }

    // ── Components ──

    /// Add a component. Returns its ComponentId.
    ///
    /// Fails once every addressable id has been issued (removed components
    /// keep theirs), or if the component has more pins than a `PinId` can index.
    pub fn add_component(&mut self, component: AnyComponent) -> GraphResult<ComponentId> {
        let id = ComponentId::from_index(self.components.len())
            .filter(|id| id.index() < self.max_components)
            .ok_or(GraphError::ComponentLimit {
                limit: self.max_components,
            })?;

        let slot = ComponentSlot::new(component);
        for (role, count) in [
            (PinRole::Input, slot.parameters.len()),
            (PinRole::Output, slot.outputs.len()),
        ] {
            if count > PinId::MAX_PER_ROLE {
                return Err(GraphError::TooManyPins {
                    role,
                    count,
                    limit: PinId::MAX_PER_ROLE,
                });
            }
        }

        tracing::debug!("Added component {:?} '{}'", id, slot.component.name());
        self.components.push(slot);
        self.invalidate_plan();
        Ok(id)
    }

    /// Add a built-in component created by the graph's factory.
    pub fn add_builtin(&mut self, kind: ComponentKind) -> GraphResult<ComponentId> {
        let component = self.factory.create(kind);
        self.add_component(component)
    }

    /// Remove a component, tearing down every link that touches it first.
    /// Returns the number of links removed.
    pub fn remove_component(&mut self, id: ComponentId) -> GraphResult<usize> {
        let incident = self.live_slot(id)?.incident_links();
        let removed = incident.len();
        for link_id in incident {
            self.detach_link(link_id);
        }

        let slot = &mut self.components[id.index()];
        slot.deleted = true;
        slot.last_error = None;
        self.invalidate_plan();

        debug_assert!(self.validate().is_ok(), "dangling link after removing {:?}", id);
        tracing::info!("Removed component {:?} ({} links torn down)", id, removed);
        Ok(removed)
    }

    /// Live component slot, `None` for unknown or removed ids.
    pub fn slot(&self, id: ComponentId) -> Option<&ComponentSlot> {
        self.components.get(id.index()).filter(|s| !s.deleted)
    }

    /// Mutable access to a live component body (e.g. to change a waveform).
    /// The component must keep reporting the same pins.
    pub fn component_mut(&mut self, id: ComponentId) -> Option<&mut AnyComponent> {
        self.components
            .get_mut(id.index())
            .filter(|s| !s.deleted)
            .map(|s| &mut s.component)
    }

    /// Live components in insertion order.
    pub fn components(&self) -> impl Iterator<Item = (ComponentId, &ComponentSlot)> + '_ {
        self.components
            .iter()
            .enumerate()
            .filter(|(_, slot)| !slot.deleted)
            .map(|(i, slot)| (ComponentId(i as u32), slot))
    }

    pub fn component_count(&self) -> usize {
        self.components.iter().filter(|s| !s.deleted).count()
    }

    pub fn contains_component(&self, id: ComponentId) -> bool {
        self.slot(id).is_some()
    }

    /// Last evaluation error of a component, if it is currently failing.
    pub fn evaluation_error(&self, id: ComponentId) -> Option<&EvalError> {
        self.slot(id).and_then(|s| s.last_error())
    }

    // ── Pins & parameters ──

    /// Input pin of `component` whose parameter is called `name`.
    pub fn input_named(&self, component: ComponentId, name: &str) -> Option<PinId> {
        let slot = self.slot(component)?;
        let index = slot.parameters.iter().position(|p| p.name() == name)?;
        Some(PinId::input(component, index as u16))
    }

    /// Output pin of `component` called `name`.
    pub fn output_named(&self, component: ComponentId, name: &str) -> Option<PinId> {
        let slot = self.slot(component)?;
        let index = slot.outputs.iter().position(|o| o.name() == name)?;
        Some(PinId::output(component, index as u16))
    }

    /// Current value of a pin.
    ///
    /// Outputs report the last value their component published. Inputs report
    /// the value pulled through their link, or the parameter default when
    /// unconnected.
    pub fn pin_value(&self, pin: PinId) -> GraphResult<f64> {
        match pin.role() {
            PinRole::Input => Ok(self.parameter(pin)?.effective_value()),
            PinRole::Output => Ok(self.output_pin(pin)?.value()),
        }
    }

    pub fn is_connected(&self, pin: PinId) -> GraphResult<bool> {
        match pin.role() {
            PinRole::Input => Ok(self.parameter(pin)?.is_driven()),
            PinRole::Output => Ok(self.output_pin(pin)?.is_connected()),
        }
    }

    /// Parameter backing an input pin.
    pub fn parameter(&self, pin: PinId) -> GraphResult<&ComponentParameter> {
        if !pin.is_input() {
            return Err(GraphError::UnknownPin(pin));
        }
        self.live_slot(pin.component())?
            .parameters
            .get(pin.index() as usize)
            .ok_or(GraphError::UnknownPin(pin))
    }

    pub fn output_pin(&self, pin: PinId) -> GraphResult<&OutputPin> {
        if !pin.is_output() {
            return Err(GraphError::UnknownPin(pin));
        }
        self.live_slot(pin.component())?
            .outputs
            .get(pin.index() as usize)
            .ok_or(GraphError::UnknownPin(pin))
    }

    /// Whether the parameter behind `pin` is driven by a link.
    pub fn is_driven(&self, pin: PinId) -> GraphResult<bool> {
        Ok(self.parameter(pin)?.is_driven())
    }

    /// Store a new default for the parameter behind `pin`. Always accepted,
    /// including while the parameter is driven.
    pub fn set_default(&mut self, pin: PinId, value: f64) -> GraphResult<()> {
        self.parameter(pin)?;
        self.components[pin.component().index()].parameters[pin.index() as usize]
            .set_default(value);
        Ok(())
    }

    /// Pins on the far side of every link attached to `pin`.
    pub fn linked_pins(&self, pin: PinId) -> GraphResult<Vec<PinId>> {
        let link_ids: Vec<LinkId> = match pin.role() {
            PinRole::Input => self.parameter(pin)?.pin().link().into_iter().collect(),
            PinRole::Output => self.output_pin(pin)?.links().to_vec(),
        };
        Ok(link_ids
            .into_iter()
            .filter_map(|id| self.link(id))
            .filter_map(|link| link.other_end(pin))
            .collect())
    }

    // ── Links ──

    pub fn link(&self, id: LinkId) -> Option<&Link> {
        self.links.get(id.index()).and_then(|l| l.as_ref())
    }

    /// Live links in creation order.
    pub fn links(&self) -> impl Iterator<Item = &Link> + '_ {
        self.links.iter().flatten()
    }

    pub fn link_count(&self) -> usize {
        self.links().count()
    }

    /// Link `a` and `b`. The pins may be given in either order; exactly one
    /// must be an output.
    ///
    /// With [`ReconnectPolicy::Replace`] an input that is already linked drops
    /// its old link in the same step. With [`ReconnectPolicy::Reject`] the
    /// request fails with `InputAlreadyBound`. On any error the graph is left
    /// untouched.
    pub fn connect(&mut self, a: PinId, b: PinId) -> GraphResult<LinkId> {
        let (output, input) = self.orient(a, b)?;
        let replaced = self
            .validate_connection(output, input, None)
            .inspect_err(|e| tracing::debug!("Rejected link {:?} -> {:?}: {}", output, input, e))?;

        if let Some(old) = replaced {
            tracing::debug!("Replacing link {:?} on {:?}", old, input);
            self.detach_link(old);
        }
        Ok(self.attach_link(output, input))
    }

    /// Remove a link.
    pub fn disconnect(&mut self, id: LinkId) -> GraphResult<()> {
        self.detach_link(id)
            .map(|_| ())
            .ok_or(GraphError::UnknownLink(id))
    }

    /// Remove every link on `pin`. Idempotent: returns 0 for an unconnected pin.
    pub fn disconnect_pin(&mut self, pin: PinId) -> GraphResult<usize> {
        let link_ids: Vec<LinkId> = match pin.role() {
            PinRole::Input => self.parameter(pin)?.pin().link().into_iter().collect(),
            PinRole::Output => self.output_pin(pin)?.links().to_vec(),
        };
        let count = link_ids.len();
        for id in link_ids {
            self.detach_link(id);
        }
        Ok(count)
    }

    /// Re-point one end of an existing link (drag-to-reconnect).
    ///
    /// The new configuration is validated as if the old link were gone. On
    /// success the link keeps its id and moves in one step. On failure nothing
    /// changes.
    pub fn relink(&mut self, id: LinkId, end: LinkEnd, pin: PinId) -> GraphResult<()> {
        let current = self.link(id).cloned().ok_or(GraphError::UnknownLink(id))?;
        self.resolve_pin(pin)?;

        let moved = current.endpoint(end);
        if pin.role() != moved.role() {
            return Err(GraphError::RoleMismatch { a: moved, b: pin });
        }
        if pin == moved {
            return Ok(());
        }

        let (output, input) = match end {
            LinkEnd::Source => (pin, current.destination),
            LinkEnd::Destination => (current.source, pin),
        };
        let replaced = self.validate_connection(output, input, Some(id))?;

        if let Some(old) = replaced {
            self.detach_link(old);
        }

        // Commit: unhook the moved end, hook the new one
        match end {
            LinkEnd::Source => {
                self.components[moved.component().index()].outputs[moved.index() as usize]
                    .links
                    .retain(|&l| l != id);
                self.components[pin.component().index()].outputs[pin.index() as usize]
                    .links
                    .push(id);
            }
            LinkEnd::Destination => {
                self.components[moved.component().index()].parameters[moved.index() as usize]
                    .pin
                    .link = None;
                self.components[pin.component().index()].parameters[pin.index() as usize]
                    .pin
                    .link = Some(id);
            }
        }
        if let Some(link) = self.links[id.index()].as_mut() {
            link.source = output;
            link.destination = input;
        }
        self.refresh_pulled(input, output);
        self.invalidate_plan();

        tracing::debug!("Re-pointed link {:?}: {:?} -> {:?}", id, output, input);
        Ok(())
    }

    // ── Evaluation ──

    /// Components in evaluation order, recompiled first if the topology changed.
    pub fn evaluation_order(&mut self) -> &[ComponentId] {
        &self.plan().order
    }

    /// Current evaluation plan, recompiled first if the topology changed.
    pub fn plan(&mut self) -> &EvaluationPlan {
        self.recompile_if_needed();
        &self.plan
    }

    /// Run one evaluation pass over the whole graph.
    pub fn tick(&mut self) -> TickStats {
        self.recompile_if_needed();

        let time = self.tick as f64 / self.settings.sample_rate;
        let mut stats = TickStats::default();

        for position in 0..self.plan.order.len() {
            let id = self.plan.order[position];
            self.pull_inputs(id);
            stats.evaluated += 1;
            if !self.evaluate_component(id, time) {
                stats.failed += 1;
            }
        }

        self.tick += 1;
        stats
    }

    /// Run `frames` ticks, returning the number of failed evaluations.
    pub fn run(&mut self, frames: usize) -> usize {
        (0..frames).map(|_| self.tick().failed).sum()
    }

    /// Reset every component's internal state, zero all outputs and restart
    /// the tick counter. Topology and defaults are kept.
    pub fn reset(&mut self) {
        for slot in self.components.iter_mut().filter(|s| !s.deleted) {
            slot.component.reset();
            slot.last_error = None;
            for output in &mut slot.outputs {
                output.value = 0.0;
            }
            for param in &mut slot.parameters {
                param.pin.pulled = 0.0;
            }
        }
        self.tick = 0;
    }

    /// Check link bookkeeping: every link endpoint exists and both pins point
    /// back at the link, and every pin's links exist.
    pub fn validate(&self) -> GraphResult<()> {
        for link in self.links() {
            for pin in [link.source, link.destination] {
                if self.resolve_pin(pin).is_err() {
                    return Err(GraphError::DanglingReference { link: link.id, pin });
                }
            }
            let source_ok = self.components[link.source_component().index()].outputs
                [link.source.index() as usize]
                .links
                .contains(&link.id);
            let destination_ok = self.components[link.destination_component().index()]
                .parameters[link.destination.index() as usize]
                .pin
                .link
                == Some(link.id);
            if !source_ok {
                return Err(GraphError::DanglingReference {
                    link: link.id,
                    pin: link.source,
                });
            }
            if !destination_ok {
                return Err(GraphError::DanglingReference {
                    link: link.id,
                    pin: link.destination,
                });
            }
        }

        for (_, slot) in self.components() {
            for param in &slot.parameters {
                if let Some(link_id) = param.pin.link {
                    if self.link(link_id).is_none() {
                        return Err(GraphError::UnknownLink(link_id));
                    }
                }
            }
            for output in &slot.outputs {
                if let Some(&missing) = output.links.iter().find(|&&l| self.link(l).is_none()) {
                    return Err(GraphError::UnknownLink(missing));
                }
            }
        }
        Ok(())
    }

    // ── Internals ──

    fn live_slot(&self, id: ComponentId) -> GraphResult<&ComponentSlot> {
        self.slot(id).ok_or(GraphError::UnknownComponent(id))
    }

    fn resolve_pin(&self, pin: PinId) -> GraphResult<()> {
        let slot = self.live_slot(pin.component())?;
        let count = match pin.role() {
            PinRole::Input => slot.parameters.len(),
            PinRole::Output => slot.outputs.len(),
        };
        if (pin.index() as usize) < count {
            Ok(())
        } else {
            Err(GraphError::UnknownPin(pin))
        }
    }

    /// Resolve both pins and sort them into `(output, input)`.
    fn orient(&self, a: PinId, b: PinId) -> GraphResult<(PinId, PinId)> {
        self.resolve_pin(a)?;
        self.resolve_pin(b)?;
        match (a.role(), b.role()) {
            (PinRole::Output, PinRole::Input) => Ok((a, b)),
            (PinRole::Input, PinRole::Output) => Ok((b, a)),
            _ => Err(GraphError::RoleMismatch { a, b }),
        }
    }

    /// Decide whether `output -> input` may be committed. `moving` is a link
    /// being re-pointed, treated as already gone. Returns the link the new
    /// one would replace, if any. Never mutates.
    fn validate_connection(
        &self,
        output: PinId,
        input: PinId,
        moving: Option<LinkId>,
    ) -> GraphResult<Option<LinkId>> {
        if output.component() == input.component() {
            return Err(GraphError::SameComponent {
                a: output,
                b: input,
            });
        }

        let existing = self
            .parameter(input)?
            .pin()
            .link()
            .filter(|&l| Some(l) != moving);

        let replaced = match existing {
            None => None,
            Some(existing) => {
                if self.link(existing).map(|l| l.source) == Some(output) {
                    return Err(GraphError::DuplicateLink {
                        output,
                        input,
                        existing,
                    });
                }
                match self.settings.reconnect_policy {
                    ReconnectPolicy::Reject => {
                        return Err(GraphError::InputAlreadyBound { input, existing });
                    }
                    ReconnectPolicy::Replace => Some(existing),
                }
            }
        };

        // output's component gains a dependent: input's component. That closes
        // a cycle iff output's component is already downstream of input's.
        let ignore = [replaced, moving];
        if self.is_downstream(input.component(), output.component(), &ignore) {
            return Err(GraphError::CycleRejected { output, input });
        }

        Ok(replaced)
    }

    /// Whether `target` can be reached from `from` by following links
    /// downstream, skipping the links in `ignore`.
    fn is_downstream(&self, from: ComponentId, target: ComponentId, ignore: &[Option<LinkId>]) -> bool {
        // O(slots ever issued) for the visited set
        let mut visited = vec![false; self.components.len()];
        let mut stack = vec![from];

        while let Some(current) = stack.pop() {
            if current == target {
                return true;
            }
            let idx = current.index();
            if idx >= self.components.len() || visited[idx] {
                continue;
            }
            visited[idx] = true;

            for output in &self.components[idx].outputs {
                for &link_id in &output.links {
                    if ignore.contains(&Some(link_id)) {
                        continue;
                    }
                    if let Some(link) = self.link(link_id) {
                        stack.push(link.destination_component());
                    }
                }
            }
        }
        false
    }

    fn attach_link(&mut self, output: PinId, input: PinId) -> LinkId {
        let id = LinkId(self.links.len() as u32);
        self.links.push(Some(Link {
            id,
            source: output,
            destination: input,
        }));
        self.components[output.component().index()].outputs[output.index() as usize]
            .links
            .push(id);
        self.components[input.component().index()].parameters[input.index() as usize]
            .pin
            .link = Some(id);
        self.refresh_pulled(input, output);
        self.invalidate_plan();

        tracing::debug!("Added link {:?}: {:?} -> {:?}", id, output, input);
        id
    }

    /// Take a link out of the table and clear both endpoints.
    fn detach_link(&mut self, id: LinkId) -> Option<Link> {
        let link = self.links.get_mut(id.index())?.take()?;

        if let Some(slot) = self.components.get_mut(link.source_component().index()) {
            if let Some(output) = slot.outputs.get_mut(link.source.index() as usize) {
                output.links.retain(|&l| l != id);
            }
        }
        if let Some(slot) = self.components.get_mut(link.destination_component().index()) {
            if let Some(param) = slot.parameters.get_mut(link.destination.index() as usize) {
                if param.pin.link == Some(id) {
                    param.pin.link = None;
                }
            }
        }
        self.invalidate_plan();

        tracing::debug!("Removed link {:?}", id);
        Some(link)
    }

    /// Make a freshly linked input report its source's value right away.
    fn refresh_pulled(&mut self, input: PinId, output: PinId) {
        let value = self.components[output.component().index()].outputs[output.index() as usize]
            .value;
        self.components[input.component().index()].parameters[input.index() as usize]
            .pin
            .pulled = value;
    }

    /// Invalidate the evaluation plan (called on every topology change).
    fn invalidate_plan(&mut self) {
        self.plan_dirty = true;
        self.generation += 1;
    }

    /// Recompile the evaluation plan if needed (lazy recompilation).
    fn recompile_if_needed(&mut self) {
        if self.plan_dirty {
            self.plan = OrderCompiler::compile(&self.components, &self.links, self.generation);
            self.plan_dirty = false;

            tracing::info!(
                "Graph recompiled: {} components / {} links (gen {})",
                self.plan.stats.total_components,
                self.plan.stats.total_links,
                self.plan.generation,
            );
        }
    }

    fn source_value(&self, link_id: LinkId) -> Option<f64> {
        let link = self.link(link_id)?;
        let slot = self.slot(link.source_component())?;
        slot.outputs
            .get(link.source.index() as usize)
            .map(|o| o.value)
    }

    /// Refresh every driven parameter of `id` from its link's source.
    fn pull_inputs(&mut self, id: ComponentId) {
        let idx = id.index();
        for p in 0..self.components[idx].parameters.len() {
            let Some(link_id) = self.components[idx].parameters[p].pin.link else {
                continue;
            };
            let value = self.source_value(link_id);
            debug_assert!(value.is_some(), "dangling link {:?} into {:?}", link_id, id);
            let value = value.unwrap_or_else(|| {
                tracing::error!("Dangling link {:?} into component {:?}", link_id, id);
                self.settings.fallback_value
            });
            self.components[idx].parameters[p].pin.pulled = value;
        }
    }

    /// Evaluate one component and publish its outputs. Returns false if the
    /// component failed and the fallback value was published instead.
    fn evaluate_component(&mut self, id: ComponentId, time: f64) -> bool {
        let fallback = self.settings.fallback_value;
        let sample_rate = self.settings.sample_rate;
        let tick = self.tick;
        let slot = &mut self.components[id.index()];

        self.input_scratch.clear();
        self.input_scratch
            .extend(slot.parameters.iter().map(|p| p.effective_value()));
        self.output_scratch.clear();
        self.output_scratch
            .extend(slot.outputs.iter().map(|o| o.value));

        let result = {
            let mut ctx = EvalContext {
                inputs: &self.input_scratch,
                outputs: &mut self.output_scratch,
                sample_rate,
                time,
                tick,
            };
            slot.component.evaluate(&mut ctx)
        }
        .and_then(|()| {
            match self.output_scratch.iter().position(|v| !v.is_finite()) {
                Some(index) => Err(EvalError::NonFinite { index }),
                None => Ok(()),
            }
        });

        match result {
            Ok(()) => {
                for (output, &value) in slot.outputs.iter_mut().zip(&self.output_scratch) {
                    output.value = value;
                }
                if let Some(previous) = slot.last_error.take() {
                    tracing::info!(
                        "Component {:?} '{}' recovered (was: {})",
                        id,
                        slot.component.name(),
                        previous
                    );
                }
                true
            }
            Err(err) => {
                for output in &mut slot.outputs {
                    output.value = fallback;
                }
                // One warning per failure streak, not one per tick
                if slot.last_error.is_none() {
                    tracing::warn!(
                        "Component {:?} '{}' failed to evaluate, publishing {}: {}",
                        id,
                        slot.component.name(),
                        fallback,
                        err
                    );
                } else {
                    tracing::trace!("Component {:?} still failing: {}", id, err);
                }
                slot.last_error = Some(err);
                false
            }
        }
    }
}

impl Default for Graph {
    fn default() -> Self {
        Self::new(EngineSettings::default())
    }
}
