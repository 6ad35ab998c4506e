// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The [`EntityComponent`] capability trait.

use alloc::borrow::Cow;
use alloc::vec::Vec;

use understory_gadget::signal::{Subscription, UpdateHandler};
use understory_gadget::visual::ModelVisual;

use crate::interface::{EndpointAddr, InitialInterfaceLock, InterfaceProp};

/// A reusable behavior that contributes to a composed spatial entity.
///
/// A component declares the interfaces it transmits and receives, any
/// interface locks, the parent it would like the entity to have, and whether it
/// needs transforms. It may also render child visuals.
///
/// Components are owned by the scene author. A composition only reads them and
/// registers for their updates through [`on_update`](Self::on_update).
///
/// Every accessor except `on_update` has a default describing a component that
/// contributes nothing, so implementations only override what they declare.
/// Accessors return [`Cow`] so components with plain fields can lend them and
/// components with interior mutability can hand out a snapshot.
pub trait EntityComponent {
    /// Interfaces this component transmits, in registration order.
    fn transmits(&self) -> Cow<'_, [InterfaceProp]> {
        Cow::Borrowed(&[])
    }

    /// Interfaces this component receives, in registration order.
    fn receives(&self) -> Cow<'_, [InterfaceProp]> {
        Cow::Borrowed(&[])
    }

    /// Interface connections to establish at creation.
    fn interface_locks(&self) -> Cow<'_, [InitialInterfaceLock]> {
        Cow::Borrowed(&[])
    }

    /// The parent this component wants the entity attached to.
    fn parent(&self) -> Option<EndpointAddr> {
        None
    }

    /// Whether this component needs the entity's transform updates.
    fn wants_transforms(&self) -> bool {
        false
    }

    /// Child visuals rendered under the composed entity.
    fn render(&self) -> Vec<ModelVisual> {
        Vec::new()
    }

    /// Registers the handler to call whenever this component's declarations change.
    ///
    /// Registration must be idempotent: registering again replaces the previous
    /// handler (the last one wins) and a single change invokes the handler once.
    /// [`UpdateNotifier`](understory_gadget::signal::UpdateNotifier) implements
    /// exactly this contract.
    fn on_update(&self, handler: UpdateHandler) -> Subscription;
}
