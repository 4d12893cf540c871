// SPDX-License-Identifier: MPL-2.0

use crate::{error::Result, trigger::TriggerType};

/// An opaque handle to a virtual interrupt wired up by the parent
/// controller.
///
/// Minted by [`ParentIrqChip::allocate`] and owned by the domain controller
/// for as long as the pin binding exists.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DelegatedIrq(u32);

impl DelegatedIrq {
    /// Wraps a raw virtual interrupt number.
    pub const fn new(virq: u32) -> Self {
        Self(virq)
    }

    /// Returns the raw virtual interrupt number.
    pub fn num(self) -> u32 {
        self.0
    }
}

/// A delegated-allocation request toward the parent controller.
///
/// The physical-line identity and the initial trigger type are distinct
/// fields; neither is allowed to stand in for the other.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct UpstreamSpec {
    /// The identity of the physical line on the parent controller that the
    /// allocated slot drives.
    pub physical_line: u32,
    /// The initial trigger type the parent should configure the line with.
    pub trigger: TriggerType,
}

/// The upstream interrupt controller owning the shared hardware lines.
///
/// A fixed capability set, dyn-dispatched so that whichever concrete
/// controller is present on the platform can stand behind it. Calls are
/// never made while the domain controller's lock is held; implementations
/// synchronize internally and may re-enter the domain API, but only for
/// pins other than the one being operated on.
pub trait ParentIrqChip: Send + Sync {
    /// Registers a child interrupt domain covering pins `0..=last_pin`.
    ///
    /// Called once during initialization, before any allocation.
    fn register_child(&self, last_pin: u32) -> Result<()>;

    /// Finishes wiring one shared line and returns the handle for it.
    fn allocate(&self, spec: &UpstreamSpec) -> Result<DelegatedIrq>;

    /// Releases previously allocated lines in bulk.
    fn free(&self, handles: &[DelegatedIrq]);

    /// Reconfigures the trigger type of an allocated line.
    fn set_type(&self, handle: DelegatedIrq, trigger: TriggerType) -> Result<()>;

    /// Masks the line.
    fn mask(&self, handle: DelegatedIrq);

    /// Unmasks the line.
    fn unmask(&self, handle: DelegatedIrq);

    /// Signals end-of-interrupt for the line.
    fn eoi(&self, handle: DelegatedIrq);

    /// Resends a lost interrupt on the line.
    fn retrigger(&self, handle: DelegatedIrq) -> Result<()>;

    /// Routes the line to the CPUs selected by `cpu_mask`.
    fn set_affinity(&self, handle: DelegatedIrq, cpu_mask: u64) -> Result<()>;
}
