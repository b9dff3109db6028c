//! Capture buffer pool tied to the armed state.
//!
//! Buffers are requested from the driver one at a time at arm and released
//! as a set at disarm. Allocation is all-or-nothing: a failure partway
//! through frees every buffer already allocated in the batch before the
//! error propagates, so no partial buffer set ever survives a failed arm.

use log::{debug, warn};

use crate::driver::{BufferDescriptor, CameraDriver, CameraHandle};
use crate::error::{CameraError, CameraResult};

/// The set of capture buffers registered with the driver.
///
/// Empty while the session is disarmed.
#[derive(Debug, Default)]
pub struct BufferPool {
    buffers: Vec<BufferDescriptor>,
}

impl BufferPool {
    /// An empty pool.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Allocate `count` buffers of `bytes` each.
    ///
    /// On any individual failure the already-allocated buffers are freed
    /// before the error is returned.
    pub fn allocate(
        driver: &dyn CameraDriver,
        handle: CameraHandle,
        count: usize,
        bytes: u32,
    ) -> CameraResult<Self> {
        let mut buffers = Vec::with_capacity(count);
        for index in 0..count {
            match driver.allocate_buffer(handle, bytes) {
                Ok(descriptor) => {
                    debug!(
                        "buffer {} registered at {:#x} (event {:#x})",
                        descriptor.number, descriptor.address, descriptor.event_handle
                    );
                    buffers.push(descriptor);
                }
                Err(source) => {
                    warn!(
                        "allocation of buffer {index} failed, freeing {} already allocated",
                        buffers.len()
                    );
                    free_each(driver, handle, &mut buffers);
                    return Err(CameraError::AllocationFailed {
                        index,
                        count,
                        source,
                    });
                }
            }
        }
        Ok(Self { buffers })
    }

    /// Release every buffer in the pool.
    ///
    /// Removes the driver's pending-buffer linkage first, then frees each
    /// descriptor. Driver failures are logged, not raised: release runs on
    /// teardown paths that must not fail. Calling with an empty pool is a
    /// no-op.
    pub fn release(&mut self, driver: &dyn CameraDriver, handle: CameraHandle) {
        if self.buffers.is_empty() {
            return;
        }
        debug!("releasing {} capture buffers", self.buffers.len());
        if let Err(err) = driver.remove_all_buffers(handle) {
            warn!("failed to remove pending buffers: {err}");
        }
        free_each(driver, handle, &mut self.buffers);
    }

    /// Number of buffers currently held.
    pub fn len(&self) -> usize {
        self.buffers.len()
    }

    /// Whether the pool holds no buffers.
    pub fn is_empty(&self) -> bool {
        self.buffers.is_empty()
    }
}

fn free_each(driver: &dyn CameraDriver, handle: CameraHandle, buffers: &mut Vec<BufferDescriptor>) {
    for descriptor in buffers.drain(..) {
        if let Err(err) = driver.free_buffer(handle, descriptor.number) {
            warn!("failed to free buffer {}: {err}", descriptor.number);
        }
    }
}
