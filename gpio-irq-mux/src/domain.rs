// SPDX-License-Identifier: MPL-2.0

use alloc::{boxed::Box, collections::BTreeMap, sync::Arc, vec::Vec};

use line_pool::LinePool;
use log::{debug, error};
use smallvec::SmallVec;
use spin::Mutex;

use crate::{
    bank::{BankTable, PinBank},
    error::{Errno, Error, Result},
    mux::{MuxRegs, MAX_SHARED_LINES},
    ownership::GpioOwnership,
    parent::{DelegatedIrq, ParentIrqChip, UpstreamSpec},
    regs::RegisterMap,
    return_errno_with_msg,
    trigger::TriggerType,
};

/// The trigger type a freshly allocated line is delegated upward with.
/// Consumers reconfigure it afterwards via [`GpioIrqMux::set_trigger_type`].
const DEFAULT_UPSTREAM_TRIGGER: TriggerType = TriggerType::EdgeRising;

/// The hardware description of one multiplexer instance.
///
/// Built once by platform discovery code (which is not this crate's
/// business) and consumed by [`GpioIrqMux::new`]. Immutable afterwards.
#[derive(Debug)]
pub struct MuxDescription {
    /// The pin banks of the device.
    pub banks: Vec<PinBank>,
    /// The physical-line identity on the parent controller for each shared
    /// line, indexed by slot. The length of this list is the pool size.
    pub upstream_lines: Vec<u32>,
}

/// State guarded by the controller lock: the line pool and the delegated
/// handle of every live binding.
struct MuxState {
    pool: LinePool,
    delegated: BTreeMap<u32, DelegatedIrq>,
}

/// The hierarchical interrupt domain of one GPIO interrupt multiplexer.
///
/// One instance owns one multiplexer: its register block, its pool of
/// shared lines, and its links to the parent interrupt controller and the
/// GPIO ownership service. Multiple multiplexer instances are independent,
/// each with its own lock and pool.
///
/// The internal lock is held only for the pool bookkeeping and the
/// register read-modify-writes, never across a delegation call into the
/// parent controller.
pub struct GpioIrqMux {
    banks: BankTable,
    upstream_lines: Box<[u32]>,
    mux: MuxRegs,
    state: Mutex<MuxState>,
    parent: Arc<dyn ParentIrqChip>,
    ownership: Arc<dyn GpioOwnership>,
}

impl GpioIrqMux {
    /// Initializes the domain from the hardware description and registers
    /// it with the parent controller.
    ///
    /// All shared lines start out free. An incomplete description, more
    /// upstream lines than the register protocol can route, or a failed
    /// parent registration is fatal: the subsystem does not come up.
    pub fn new(
        description: MuxDescription,
        regs: Arc<dyn RegisterMap>,
        parent: Arc<dyn ParentIrqChip>,
        ownership: Arc<dyn GpioOwnership>,
    ) -> Result<Self> {
        if description.banks.is_empty() {
            error!("no pin banks described");
            return_errno_with_msg!(Errno::InitFailed, "description contains no pin banks");
        }
        if description.banks.iter().any(|bank| bank.count == 0) {
            error!("empty pin bank described");
            return_errno_with_msg!(Errno::InitFailed, "description contains an empty pin bank");
        }
        if description.upstream_lines.is_empty() {
            error!("no parent interrupts specified");
            return_errno_with_msg!(Errno::InitFailed, "description contains no upstream lines");
        }
        if description.upstream_lines.len() > MAX_SHARED_LINES {
            error!(
                "{} upstream lines described, the mux can route {}",
                description.upstream_lines.len(),
                MAX_SHARED_LINES
            );
            return_errno_with_msg!(
                Errno::InitFailed,
                "more upstream lines than the mux can route"
            );
        }

        let banks = BankTable::new(description.banks.into_boxed_slice());
        let upstream_lines = description.upstream_lines.into_boxed_slice();
        let pool = LinePool::new(upstream_lines.len());

        if parent.register_child(banks.last_pin()).is_err() {
            error!("can't register with the parent interrupt domain");
            return_errno_with_msg!(Errno::InitFailed, "parent domain registration failed");
        }

        Ok(Self {
            banks,
            upstream_lines,
            mux: MuxRegs::new(regs),
            state: Mutex::new(MuxState {
                pool,
                delegated: BTreeMap::new(),
            }),
            parent,
            ownership,
        })
    }

    /// Allocates a shared line for each pin, in caller-supplied order, and
    /// delegates the wiring of the corresponding physical lines upward.
    ///
    /// Each pin is routed through the first free slot and its line's filter
    /// is programmed to the hardware default; the parent is then asked to
    /// finish wiring the slot's physical line with a default trigger type.
    /// Returns one handle per pin, in request order.
    ///
    /// # Errors
    ///
    /// Fails with `ResourceExhausted` when the pool runs out, with
    /// `InvalidArgs` for a pin outside every bank or already routed, and
    /// propagates parent-controller failures unchanged. A failure aborts
    /// the batch: pins already processed stay allocated, the failing pin is
    /// left unbound, and the remaining pins are not touched.
    pub fn allocate(&self, hwirqs: &[u32]) -> Result<SmallVec<[DelegatedIrq; 1]>> {
        let mut handles = SmallVec::new();

        for &hwirq in hwirqs {
            let bank = self.resolve_bank(hwirq)?;

            let slot = {
                let mut state = self.state.lock();
                if state.pool.find_by_pin(hwirq).is_some() {
                    return_errno_with_msg!(Errno::InvalidArgs, "pin is already routed");
                }
                let Some(slot) = state.pool.find_free() else {
                    error!("no free upstream interrupt line found");
                    return_errno_with_msg!(Errno::ResourceExhausted, "all shared lines are in use");
                };
                debug!("routing hwirq {} through free upstream line {}", hwirq, slot);
                state.pool.bind(slot, hwirq);
                self.mux.program_binding(bank, slot, hwirq);
                slot
            };

            let spec = UpstreamSpec {
                physical_line: self.upstream_lines[slot],
                trigger: DEFAULT_UPSTREAM_TRIGGER,
            };
            match self.parent.allocate(&spec) {
                Ok(handle) => {
                    self.state.lock().delegated.insert(hwirq, handle);
                    handles.push(handle);
                }
                Err(err) => {
                    // No binding survives a failed allocation.
                    self.state.lock().pool.unbind(slot);
                    return Err(err);
                }
            }
        }

        Ok(handles)
    }

    /// Frees the bindings of the given pins and delegates one bulk free to
    /// the parent controller.
    ///
    /// Pins without an active binding are skipped; tearing down an
    /// already-free pin is not an error.
    pub fn free(&self, hwirqs: &[u32]) -> Result<()> {
        let mut handles: SmallVec<[DelegatedIrq; 1]> = SmallVec::new();

        {
            let mut state = self.state.lock();
            for &hwirq in hwirqs {
                let Some(slot) = state.pool.find_by_pin(hwirq) else {
                    continue;
                };
                state.pool.unbind(slot);
                if let Some(handle) = state.delegated.remove(&hwirq) {
                    handles.push(handle);
                }
            }
        }

        self.parent.free(&handles);
        Ok(())
    }

    /// Reconfigures the trigger type of an allocated pin.
    ///
    /// The edge/polarity bit pair of the pin's slot is programmed locally;
    /// the parent is then given the normalized type (the mux inverts the
    /// polarity ahead of it) and its result is propagated unchanged.
    ///
    /// # Errors
    ///
    /// Fails with `UnknownBinding` if the pin has no active binding.
    pub fn set_trigger_type(&self, hwirq: u32, trigger: TriggerType) -> Result<()> {
        debug!("set type of hwirq {} to {:?}", hwirq, trigger);

        let handle = {
            let state = self.state.lock();
            let Some(slot) = state.pool.find_by_pin(hwirq) else {
                error!("hwirq {} not allocated", hwirq);
                return_errno_with_msg!(Errno::UnknownBinding, "pin has no active binding");
            };
            self.mux.program_trigger(slot, trigger);
            *state
                .delegated
                .get(&hwirq)
                .ok_or(Error::new(Errno::UnknownBinding))?
        };

        self.parent.set_type(handle, trigger.normalized_for_parent())
    }

    /// Claims the pin for exclusive interrupt use.
    ///
    /// Must succeed before the pin is allocated. Fails with
    /// `OwnershipConflict` if the pin is claimed for general-purpose I/O
    /// and with `InvalidArgs` for a pin outside every bank.
    pub fn request_resources(&self, hwirq: u32) -> Result<()> {
        self.resolve_bank(hwirq)?;
        self.ownership.claim_for_irq(hwirq)
    }

    /// Releases the interrupt-use claim taken by [`request_resources`].
    ///
    /// [`request_resources`]: Self::request_resources
    pub fn release_resources(&self, hwirq: u32) {
        if self.banks.find(hwirq).is_none() {
            return;
        }
        self.ownership.release_from_irq(hwirq);
    }

    /// Masks the pin's interrupt at the parent controller.
    pub fn mask(&self, hwirq: u32) -> Result<()> {
        self.parent.mask(self.handle_of(hwirq)?);
        Ok(())
    }

    /// Unmasks the pin's interrupt at the parent controller.
    pub fn unmask(&self, hwirq: u32) -> Result<()> {
        self.parent.unmask(self.handle_of(hwirq)?);
        Ok(())
    }

    /// Signals end-of-interrupt to the parent controller.
    pub fn eoi(&self, hwirq: u32) -> Result<()> {
        self.parent.eoi(self.handle_of(hwirq)?);
        Ok(())
    }

    /// Asks the parent controller to resend the pin's interrupt.
    pub fn retrigger(&self, hwirq: u32) -> Result<()> {
        self.parent.retrigger(self.handle_of(hwirq)?)
    }

    /// Routes the pin's interrupt to the CPUs selected by `cpu_mask`.
    pub fn set_affinity(&self, hwirq: u32, cpu_mask: u64) -> Result<()> {
        self.parent.set_affinity(self.handle_of(hwirq)?, cpu_mask)
    }

    /// Returns the size of the shared-line pool.
    pub fn line_count(&self) -> usize {
        self.upstream_lines.len()
    }

    /// Returns the number of currently free shared lines.
    pub fn free_line_count(&self) -> usize {
        self.state.lock().pool.free_count()
    }

    /// Returns `true` if the pin currently has a shared line allocated.
    pub fn is_bound(&self, hwirq: u32) -> bool {
        self.state.lock().pool.find_by_pin(hwirq).is_some()
    }

    fn resolve_bank(&self, hwirq: u32) -> Result<&PinBank> {
        self.banks
            .find(hwirq)
            .ok_or(Error::with_msg(Errno::InvalidArgs, "pin belongs to no bank"))
    }

    fn handle_of(&self, hwirq: u32) -> Result<DelegatedIrq> {
        self.state
            .lock()
            .delegated
            .get(&hwirq)
            .copied()
            .ok_or(Error::with_msg(
                Errno::UnknownBinding,
                "pin has no active binding",
            ))
    }
}
