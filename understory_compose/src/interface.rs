// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Interface declarations and endpoint addresses.

use alloc::borrow::Cow;
use alloc::collections::BTreeMap;
use alloc::string::String;
use core::fmt;

/// The kind of scene-graph participant an [`EndpointAddr`] refers to.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum EndpointType {
    /// Not known (yet).
    #[default]
    Unknown,
    /// The central hub.
    Hub,
    /// A gadget process.
    Gadget,
    /// A node inside a gadget's scene graph.
    Node,
    /// The renderer.
    Renderer,
    /// A monitoring tool.
    Monitor,
}

/// Opaque, globally unique address of a scene-graph entity or endpoint.
///
/// Addresses compare by value. Only the runtime hands them out; gadget code
/// passes them around (for example as a desired parent) without interpreting them.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EndpointAddr {
    /// Participant kind.
    pub kind: EndpointType,
    /// Endpoint (process) id.
    pub endpoint_id: u32,
    /// Node id within the endpoint, `0` for the endpoint itself.
    pub node_id: u32,
}

impl EndpointAddr {
    /// Address of a node in a gadget.
    #[must_use]
    pub const fn node(endpoint_id: u32, node_id: u32) -> Self {
        Self {
            kind: EndpointType::Node,
            endpoint_id,
            node_id,
        }
    }
}

impl fmt::Display for EndpointAddr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}:{}/{}", self.kind, self.endpoint_id, self.node_id)
    }
}

/// Which side of an interface a declaration is on.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum InterfaceRole {
    /// The entity offers the interface to others.
    Transmit,
    /// The entity accepts the interface from others.
    Receive,
}

/// A parameter value attached to an interface declaration.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(untagged))]
pub enum ParamValue {
    /// A flag.
    Bool(bool),
    /// A number.
    Number(f64),
    /// A string.
    Text(String),
}

/// Named interface parameters, iterated in name order.
pub type InterfaceParams = BTreeMap<String, ParamValue>;

/// A declared interface capability.
///
/// The role is implied by the list the declaration sits in (transmits or
/// receives). Declarations are immutable once handed to a composition pass.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct InterfaceProp {
    /// Interface name, conventionally `name@version`.
    pub iface: Cow<'static, str>,
    /// Interface parameters.
    #[cfg_attr(feature = "serde", serde(default))]
    pub params: InterfaceParams,
}

impl InterfaceProp {
    /// Declares `iface` with no parameters.
    #[must_use]
    pub fn new(iface: impl Into<Cow<'static, str>>) -> Self {
        Self {
            iface: iface.into(),
            params: InterfaceParams::new(),
        }
    }

    /// Adds a parameter.
    #[must_use]
    pub fn with_param(mut self, name: impl Into<String>, value: ParamValue) -> Self {
        self.params.insert(name.into(), value);
        self
    }
}

/// Pins an interface connection at creation instead of leaving it to discovery.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct InitialInterfaceLock {
    /// Interface to lock.
    pub iface: Cow<'static, str>,
    /// The entity on the other end of the locked connection.
    pub receiver: EndpointAddr,
    /// Parameters delivered with the locked connection.
    #[cfg_attr(feature = "serde", serde(default))]
    pub params: InterfaceParams,
}

impl InitialInterfaceLock {
    /// Locks `iface` to `receiver` with no parameters.
    #[must_use]
    pub fn new(iface: impl Into<Cow<'static, str>>, receiver: EndpointAddr) -> Self {
        Self {
            iface: iface.into(),
            receiver,
            params: InterfaceParams::new(),
        }
    }
}
