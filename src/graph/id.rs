//! Identity types for the graph engine.
//!
//! All IDs are newtypes over `u32` that serve as direct array indices
//! into their respective storage vectors, providing O(1) lookup.
//! Component and link slots are tombstoned on removal, so an ID is never
//! handed out twice within one graph.

use std::fmt;

use crate::graph::pin::PinRole;

/// Index into `Graph::components`.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct ComponentId(pub u32);

impl ComponentId {
    pub const INVALID: ComponentId = ComponentId(u32::MAX);

    /// Number of component ids a graph can hand out. The top value of the
    /// 20-bit field is left unused so `PinId::INVALID` never names a live component.
    pub const MAX_COUNT: usize = (1 << PinId::COMPONENT_BITS) - 1;

    /// Id for slot `index`, or `None` past [`Self::MAX_COUNT`].
    #[inline]
    pub fn from_index(index: usize) -> Option<Self> {
        (index < Self::MAX_COUNT).then_some(ComponentId(index as u32))
    }

    #[inline]
    pub fn is_valid(self) -> bool {
        self != Self::INVALID
    }

    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Debug for ComponentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if *self == Self::INVALID {
            write!(f, "ComponentId(INVALID)")
        } else {
            write!(f, "ComponentId({})", self.0)
        }
    }
}

impl fmt::Display for ComponentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// Compact pin identifier.
///
/// High 20 bits = component index, bit 11 = role (set for outputs),
/// low 11 bits = pin index within that role. Supports ~1M components with
/// 2048 inputs and 2048 outputs each.
///
/// Out-of-range parts never wrap: [`PinId::new`] yields [`PinId::INVALID`],
/// which the graph resolves as an unknown component.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct PinId(pub u32);

impl PinId {
    const INDEX_BITS: u32 = 11;
    const INDEX_MASK: u32 = (1 << Self::INDEX_BITS) - 1;
    const ROLE_BIT: u32 = 1 << Self::INDEX_BITS;
    const COMPONENT_SHIFT: u32 = Self::INDEX_BITS + 1;
    const COMPONENT_BITS: u32 = 32 - Self::COMPONENT_SHIFT;

    /// Number of pins of one role a component can expose.
    pub const MAX_PER_ROLE: usize = 1 << Self::INDEX_BITS;

    pub const INVALID: PinId = PinId(u32::MAX);

    /// Pack a pin handle, or `None` if the component or index does not fit.
    pub fn try_new(component: ComponentId, role: PinRole, index: u16) -> Option<Self> {
        if component.index() >= ComponentId::MAX_COUNT || index as usize >= Self::MAX_PER_ROLE {
            return None;
        }
        let role_bit = match role {
            PinRole::Input => 0,
            PinRole::Output => Self::ROLE_BIT,
        };
        Some(Self(
            (component.0 << Self::COMPONENT_SHIFT) | role_bit | index as u32,
        ))
    }

    /// Like [`Self::try_new`], but an unrepresentable pin becomes [`Self::INVALID`].
    pub fn new(component: ComponentId, role: PinRole, index: u16) -> Self {
        Self::try_new(component, role, index).unwrap_or(Self::INVALID)
    }

    pub fn input(component: ComponentId, index: u16) -> Self {
        Self::new(component, PinRole::Input, index)
    }

    pub fn output(component: ComponentId, index: u16) -> Self {
        Self::new(component, PinRole::Output, index)
    }

    #[inline]
    pub fn component(self) -> ComponentId {
        ComponentId(self.0 >> Self::COMPONENT_SHIFT)
    }

    #[inline]
    pub fn role(self) -> PinRole {
        if self.0 & Self::ROLE_BIT != 0 {
            PinRole::Output
        } else {
            PinRole::Input
        }
    }

    #[inline]
    pub fn index(self) -> u16 {
        (self.0 & Self::INDEX_MASK) as u16
    }

    #[inline]
    pub fn is_valid(self) -> bool {
        self != Self::INVALID
    }

    #[inline]
    pub fn is_input(self) -> bool {
        self.role() == PinRole::Input
    }

    #[inline]
    pub fn is_output(self) -> bool {
        self.role() == PinRole::Output
    }
}

impl fmt::Debug for PinId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if *self == Self::INVALID {
            return write!(f, "PinId(INVALID)");
        }
        write!(
            f,
            "PinId(component={}, {:?}#{})",
            self.component().0,
            self.role(),
            self.index()
        )
    }
}

impl fmt::Display for PinId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// Index into `Graph::links`.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LinkId(pub u32);

impl LinkId {
    pub const INVALID: LinkId = LinkId(u32::MAX);

    #[inline]
    pub fn is_valid(self) -> bool {
        self != Self::INVALID
    }

    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Debug for LinkId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if *self == Self::INVALID {
            write!(f, "LinkId(INVALID)")
        } else {
            write!(f, "LinkId({})", self.0)
        }
    }
}

impl fmt::Display for LinkId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_component_id() {
        let id = ComponentId(42);
        assert!(id.is_valid());
        assert_eq!(id.index(), 42);
        assert!(!ComponentId::INVALID.is_valid());
    }

    #[test]
    fn test_pin_id_decodes_owner_role_and_index() {
        let owner = ComponentId(100);
        let input = PinId::input(owner, 7);
        let output = PinId::output(owner, 7);

        assert_eq!(input.component(), owner);
        assert_eq!(input.role(), PinRole::Input);
        assert_eq!(input.index(), 7);

        assert_eq!(output.component(), owner);
        assert_eq!(output.role(), PinRole::Output);
        assert_eq!(output.index(), 7);

        assert_ne!(input, output);
    }

    #[test]
    fn test_pin_id_limits() {
        let owner = ComponentId((1 << 20) - 2);
        let pin = PinId::output(owner, 2047);
        assert_eq!(pin.component(), owner);
        assert_eq!(pin.index(), 2047);
        assert!(pin.is_output());
        assert!(pin.is_valid());
    }

    #[test]
    fn test_out_of_range_pins_never_alias() {
        assert_eq!(PinId::try_new(ComponentId(3), PinRole::Input, 2048), None);
        assert_eq!(PinId::input(ComponentId(3), 2048), PinId::INVALID);
        assert_ne!(PinId::input(ComponentId(3), 2048), PinId::input(ComponentId(3), 0));

        let too_far = ComponentId(1 << 20);
        assert_eq!(PinId::try_new(too_far, PinRole::Output, 0), None);
        assert_eq!(PinId::input(too_far, 0), PinId::INVALID);
        assert_ne!(PinId::input(too_far, 0).component(), ComponentId(0));
    }

    #[test]
    fn test_component_id_from_index() {
        assert_eq!(ComponentId::from_index(0), Some(ComponentId(0)));
        assert_eq!(
            ComponentId::from_index(ComponentId::MAX_COUNT - 1),
            Some(ComponentId((1 << 20) - 2))
        );
        assert_eq!(ComponentId::from_index(ComponentId::MAX_COUNT), None);
        // INVALID pins decode to the one component id that is never handed out
        assert_eq!(PinId::INVALID.component().index(), ComponentId::MAX_COUNT);
    }

    #[test]
    fn test_link_id() {
        let id = LinkId(5);
        assert!(id.is_valid());
        assert_eq!(id.index(), 5);
        assert!(!LinkId::INVALID.is_valid());
    }

    #[test]
    fn test_debug_format() {
        assert_eq!(format!("{:?}", ComponentId::INVALID), "ComponentId(INVALID)");
        assert_eq!(
            format!("{:?}", PinId::input(ComponentId(3), 1)),
            "PinId(component=3, Input#1)"
        );
    }
}
