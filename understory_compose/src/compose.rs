// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The merge of component declarations into one entity description.
//!
//! ## Precedence
//!
//! - Transmits, receives, and locks are concatenated in component order. The
//!   order is the caller's contract: the matching runtime uses it as the
//!   interface registration order when it has to break ties.
//! - The parent is the first one declared, scanning in component order. Later
//!   declarations are ignored; nothing is merged or overridden.
//! - Transforms are wanted if any component wants them.
//! - Volumes and priority come from the [`CompositionConfig`], never from
//!   components.
//! - Children start with the entity's own visuals; component visuals follow
//!   in component order.

use alloc::vec::Vec;
use smallvec::SmallVec;

use understory_gadget::geometry::Volume;
use understory_gadget::visual::ModelVisual;

use crate::component::EntityComponent;
use crate::interface::{EndpointAddr, InitialInterfaceLock, InterfaceProp, InterfaceRole};

/// One or more matching volumes; a single volume is stored inline.
pub type Volumes = SmallVec<[Volume; 1]>;

/// Entity-level settings that components do not influence.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CompositionConfig {
    /// Volumes used when matching this entity against others.
    pub volumes: Volumes,
    /// Tie-break priority among entities matching the same interface.
    #[cfg_attr(feature = "serde", serde(default))]
    pub priority: i32,
}

impl CompositionConfig {
    /// A config with a single volume and priority `0`.
    #[must_use]
    pub fn new(volume: Volume) -> Self {
        Self::from_volumes([volume])
    }

    /// A config with several volumes and priority `0`.
    #[must_use]
    pub fn from_volumes(volumes: impl IntoIterator<Item = Volume>) -> Self {
        Self {
            volumes: volumes.into_iter().collect(),
            priority: 0,
        }
    }

    /// Sets the priority.
    #[must_use]
    pub fn with_priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }
}

impl From<Volume> for CompositionConfig {
    fn from(volume: Volume) -> Self {
        Self::new(volume)
    }
}

/// The merged description handed to the spatial entity.
#[derive(Clone, Debug, Default)]
pub struct ComposedEntityDescription {
    /// Transmitted interfaces, in component order.
    pub transmits: Vec<InterfaceProp>,
    /// Received interfaces, in component order.
    pub receives: Vec<InterfaceProp>,
    /// Interface locks, in component order.
    pub interface_locks: Vec<InitialInterfaceLock>,
    /// First parent declared by any component.
    pub parent: Option<EndpointAddr>,
    /// `true` if any component wants transforms.
    pub wants_transforms: bool,
    /// Matching volumes, from the config.
    pub volumes: Volumes,
    /// Matching priority, from the config.
    pub priority: i32,
    /// The entity's own visuals, then those rendered by the components.
    pub children: Vec<ModelVisual>,
}

impl ComposedEntityDescription {
    /// Iterates over every interface with its role: transmits first, then receives.
    pub fn interfaces(&self) -> impl Iterator<Item = (InterfaceRole, &InterfaceProp)> + '_ {
        let transmits = self.transmits.iter().map(|p| (InterfaceRole::Transmit, p));
        let receives = self.receives.iter().map(|p| (InterfaceRole::Receive, p));
        transmits.chain(receives)
    }

    /// Returns `true` if the description declares no interfaces or locks.
    #[must_use]
    pub fn is_inert(&self) -> bool {
        self.transmits.is_empty() && self.receives.is_empty() && self.interface_locks.is_empty()
    }

    /// Compares everything the spatial entity consumes except rendered children.
    #[must_use]
    pub fn same_declarations(&self, other: &Self) -> bool {
        self.transmits == other.transmits
            && self.receives == other.receives
            && self.interface_locks == other.interface_locks
            && self.parent == other.parent
            && self.wants_transforms == other.wants_transforms
            && self.volumes == other.volumes
            && self.priority == other.priority
    }
}

/// Merges `components` into one entity description.
///
/// An empty component list yields empty lists, no parent, and no transforms.
///
/// ```
/// use std::borrow::Cow;
/// use std::rc::Rc;
/// use understory_compose::{
///     CompositionConfig, EndpointAddr, EntityComponent, InterfaceProp, compose,
/// };
/// use understory_gadget::geometry::Volume;
/// use understory_gadget::signal::{Subscription, UpdateHandler, UpdateNotifier};
///
/// struct Grabbable {
///     transmits: Vec<InterfaceProp>,
///     notifier: UpdateNotifier,
/// }
///
/// impl EntityComponent for Grabbable {
///     fn transmits(&self) -> Cow<'_, [InterfaceProp]> {
///         Cow::Borrowed(&self.transmits)
///     }
///     fn wants_transforms(&self) -> bool {
///         true
///     }
///     fn on_update(&self, handler: UpdateHandler) -> Subscription {
///         self.notifier.subscribe(handler)
///     }
/// }
///
/// struct Attach(EndpointAddr, UpdateNotifier);
///
/// impl EntityComponent for Attach {
///     fn parent(&self) -> Option<EndpointAddr> {
///         Some(self.0)
///     }
///     fn on_update(&self, handler: UpdateHandler) -> Subscription {
///         self.1.subscribe(handler)
///     }
/// }
///
/// let grab = Grabbable {
///     transmits: vec![InterfaceProp::new("aardvark-grab@1")],
///     notifier: UpdateNotifier::new(),
/// };
/// let attach = Attach(EndpointAddr::node(1, 7), UpdateNotifier::new());
///
/// let parts: [&dyn EntityComponent; 2] = [&grab, &attach];
/// let description = compose(parts, &CompositionConfig::new(Volume::sphere(0.1)));
///
/// assert_eq!(description.transmits[0].iface, "aardvark-grab@1");
/// assert_eq!(description.parent, Some(EndpointAddr::node(1, 7)));
/// assert!(description.wants_transforms);
/// ```
pub fn compose<'a, C>(
    components: impl IntoIterator<Item = &'a C>,
    config: &CompositionConfig,
) -> ComposedEntityDescription
where
    C: EntityComponent + ?Sized + 'a,
{
    compose_with_children(Vec::new(), components, config)
}

/// Like [`compose`], for an entity that has visuals of its own.
///
/// `children` lead [`ComposedEntityDescription::children`], followed by the
/// component visuals in component order.
pub fn compose_with_children<'a, C>(
    children: Vec<ModelVisual>,
    components: impl IntoIterator<Item = &'a C>,
    config: &CompositionConfig,
) -> ComposedEntityDescription
where
    C: EntityComponent + ?Sized + 'a,
{
    let mut description = ComposedEntityDescription {
        volumes: config.volumes.clone(),
        priority: config.priority,
        children,
        ..ComposedEntityDescription::default()
    };

    for component in components {
        description.transmits.extend_from_slice(&component.transmits());
        description.receives.extend_from_slice(&component.receives());

        let locks = component.interface_locks();
        if !locks.is_empty() {
            description.interface_locks.extend_from_slice(&locks);
        }

        if description.parent.is_none() {
            description.parent = component.parent();
        }

        description.wants_transforms |= component.wants_transforms();
        description.children.extend(component.render());
    }

    description
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::borrow::Cow;
    use alloc::vec;
    use understory_gadget::signal::{Subscription, UpdateHandler, UpdateNotifier};
    use understory_gadget::visual::ModelVisual;

    #[derive(Default)]
    struct Decl {
        transmits: Vec<InterfaceProp>,
        receives: Vec<InterfaceProp>,
        locks: Vec<InitialInterfaceLock>,
        parent: Option<EndpointAddr>,
        wants_transforms: bool,
        model: Option<&'static str>,
        notifier: UpdateNotifier,
    }

    impl EntityComponent for Decl {
        fn transmits(&self) -> Cow<'_, [InterfaceProp]> {
            Cow::Borrowed(&self.transmits)
        }

        fn receives(&self) -> Cow<'_, [InterfaceProp]> {
            Cow::Borrowed(&self.receives)
        }

        fn interface_locks(&self) -> Cow<'_, [InitialInterfaceLock]> {
            Cow::Borrowed(&self.locks)
        }

        fn parent(&self) -> Option<EndpointAddr> {
            self.parent
        }

        fn wants_transforms(&self) -> bool {
            self.wants_transforms
        }

        fn render(&self) -> Vec<ModelVisual> {
            self.model.map(ModelVisual::new).into_iter().collect()
        }

        fn on_update(&self, handler: UpdateHandler) -> Subscription {
            self.notifier.subscribe(handler)
        }
    }

    fn iface(name: &'static str) -> InterfaceProp {
        InterfaceProp::new(name)
    }

    fn names(props: &[InterfaceProp]) -> Vec<&str> {
        props.iter().map(|p| p.iface.as_ref()).collect()
    }

    fn config() -> CompositionConfig {
        CompositionConfig::new(Volume::sphere(0.5))
    }

    #[test]
    fn empty_list_composes_to_inert_root() {
        let description = compose::<Decl>([], &config());
        assert!(description.is_inert());
        assert_eq!(description.parent, None);
        assert!(!description.wants_transforms);
        assert_eq!(description.volumes.as_slice(), &[Volume::sphere(0.5)]);
        assert_eq!(description.priority, 0);
    }

    #[test]
    fn interfaces_concatenate_in_component_order() {
        let a = Decl {
            transmits: vec![iface("a-tx1"), iface("a-tx2")],
            receives: vec![iface("a-rx")],
            ..Decl::default()
        };
        let b = Decl::default();
        let c = Decl {
            transmits: vec![iface("c-tx")],
            receives: vec![iface("c-rx1"), iface("c-rx2")],
            ..Decl::default()
        };

        let description = compose([&a, &b, &c], &config());
        assert_eq!(names(&description.transmits), ["a-tx1", "a-tx2", "c-tx"]);
        assert_eq!(names(&description.receives), ["a-rx", "c-rx1", "c-rx2"]);

        let roles: Vec<_> = description.interfaces().map(|(role, _)| role).collect();
        assert_eq!(
            roles,
            [
                InterfaceRole::Transmit,
                InterfaceRole::Transmit,
                InterfaceRole::Transmit,
                InterfaceRole::Receive,
                InterfaceRole::Receive,
                InterfaceRole::Receive,
            ]
        );
    }

    #[test]
    fn first_declared_parent_wins() {
        let p = EndpointAddr::node(1, 10);
        let q = EndpointAddr::node(2, 20);
        let a = Decl::default();
        let b = Decl {
            parent: Some(p),
            ..Decl::default()
        };
        let c = Decl {
            parent: Some(q),
            ..Decl::default()
        };

        assert_eq!(compose([&a, &b, &c], &config()).parent, Some(p));
        assert_eq!(compose([&c, &b], &config()).parent, Some(q));
        assert_eq!(compose([&a], &config()).parent, None);
    }

    #[test]
    fn wants_transforms_is_or_reduced() {
        let no = Decl::default();
        let yes = Decl {
            wants_transforms: true,
            ..Decl::default()
        };

        assert!(!compose([&no, &no], &config()).wants_transforms);
        assert!(compose([&no, &yes], &config()).wants_transforms);
        assert!(compose([&yes, &no], &config()).wants_transforms);
    }

    #[test]
    fn locks_skip_components_without_any() {
        let target = EndpointAddr::node(3, 1);
        let a = Decl::default();
        let b = Decl {
            locks: vec![InitialInterfaceLock::new("l1", target)],
            ..Decl::default()
        };

        let description = compose([&a, &b], &config());
        assert_eq!(description.interface_locks.len(), 1);
        assert_eq!(description.interface_locks[0].iface, "l1");
        assert_eq!(description.interface_locks[0].receiver, target);
    }

    #[test]
    fn volume_and_priority_pass_through() {
        let a = Decl::default();
        let config = CompositionConfig::from_volumes([Volume::Infinite, Volume::sphere(1.0)])
            .with_priority(7);

        let description = compose([&a], &config);
        assert_eq!(
            description.volumes.as_slice(),
            &[Volume::Infinite, Volume::sphere(1.0)]
        );
        assert_eq!(description.priority, 7);
    }

    #[test]
    fn children_follow_component_order() {
        let a = Decl {
            model: Some("a.glb"),
            ..Decl::default()
        };
        let b = Decl::default();
        let c = Decl {
            model: Some("c.glb"),
            ..Decl::default()
        };

        let description = compose([&a, &b, &c], &config());
        let uris: Vec<_> = description.children.iter().map(|m| m.uri.as_ref()).collect();
        assert_eq!(uris, ["a.glb", "c.glb"]);
    }

    #[test]
    fn own_children_lead_component_children() {
        let a = Decl {
            model: Some("a.glb"),
            ..Decl::default()
        };
        let own = vec![ModelVisual::new("frame.glb"), ModelVisual::new("label.glb")];

        let description = compose_with_children(own, [&a], &config());
        let uris: Vec<_> = description.children.iter().map(|m| m.uri.as_ref()).collect();
        assert_eq!(uris, ["frame.glb", "label.glb", "a.glb"]);
    }

    #[test]
    fn same_declarations_ignores_children() {
        let plain = Decl::default();
        let drawn = Decl {
            model: Some("x.glb"),
            ..Decl::default()
        };
        let lhs = compose([&plain], &config());
        let rhs = compose([&drawn], &config());
        assert!(lhs.same_declarations(&rhs));
        assert!(!lhs.same_declarations(&compose([&plain], &config().with_priority(1))));
    }
}
