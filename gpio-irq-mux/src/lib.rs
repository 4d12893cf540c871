// SPDX-License-Identifier: MPL-2.0

//! GPIO interrupt multiplexer.
//!
//! Some SoCs have only a limited number of interrupt lines on the parent
//! controller side that can be used for GPIOs, far fewer than the number of
//! interrupt-capable pins. A multiplexer in front of the parent controller
//! routes any pin, on demand, onto one of those shared lines:
//!
//! ```text
//! pin -> [mux] -> [polarity] -> [filter] -> [edge select] -> parent line
//! ```
//!
//! The routing is programmed by writing the pin's bank-relative selection
//! value into a byte of one of two selection registers; the byte position
//! determines which shared line the pin drives. Edge/level sense and
//! polarity are a bit pair per line in a separate register, and a glitch
//! filter is a nibble per line in a third.
//!
//! This crate implements the multiplexer as a hierarchical interrupt
//! domain: [`GpioIrqMux`] allocates shared lines from a [`LinePool`],
//! programs the routing registers through a [`RegisterMap`], and delegates
//! the rest of the configuration upward through the [`ParentIrqChip`]
//! capability, normalizing inverted trigger polarities on the way (the mux
//! inverts the signal before the parent sees it).
//!
//! Hardware discovery is not this crate's business: the caller hands
//! [`GpioIrqMux::new`] an already-built [`MuxDescription`] along with the
//! register-map, parent-controller, and GPIO-ownership collaborators.
//!
//! [`LinePool`]: line_pool::LinePool

#![cfg_attr(not(test), no_std)]
#![warn(missing_docs)]

extern crate alloc;

pub mod error;

mod bank;
mod domain;
mod mux;
mod ownership;
mod parent;
mod regs;
mod trigger;

pub use self::{
    bank::{BankTable, PinBank},
    domain::{GpioIrqMux, MuxDescription},
    error::{Errno, Error, Result},
    ownership::GpioOwnership,
    parent::{DelegatedIrq, ParentIrqChip, UpstreamSpec},
    regs::{MmioRegisterMap, RegisterMap},
    trigger::TriggerType,
};
