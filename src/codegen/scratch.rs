// Scratch register pool. Seven general-purpose registers, allocated and
// freed by index; exhaustion is a fatal backend limit, not a language error.

use super::{CodegenError, CodegenResult};

pub const SCRATCH_REGISTERS: [&str; 7] =
    ["%rbx", "%r10", "%r11", "%r12", "%r13", "%r14", "%r15"];

#[derive(Debug, Default)]
pub struct ScratchPool {
    in_use: [bool; SCRATCH_REGISTERS.len()],
}

impl ScratchPool {
    pub fn new() -> Self {
        Self::default()
    }

    /// Claim the lowest free slot.
    pub fn alloc(&mut self) -> CodegenResult<usize> {
        for (i, used) in self.in_use.iter_mut().enumerate() {
            if !*used {
                *used = true;
                return Ok(i);
            }
        }
        return Err(CodegenError::OutOfRegisters);
    }

    pub fn free(&mut self, r: usize) {
        if let Some(slot) = self.in_use.get_mut(r) {
            *slot = false;
        }
    }

    pub fn name(r: usize) -> &'static str {
        SCRATCH_REGISTERS[r]
    }

    #[cfg(test)]
    pub fn live_count(&self) -> usize {
        self.in_use.iter().filter(|used| **used).count()
    }
}
