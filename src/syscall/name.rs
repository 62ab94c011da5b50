/*
 * SPAWN name-string copy
 *
 * Reads a NUL-terminated program name out of the caller's virtual memory
 * one byte at a time. An MMU miss on a byte falls through to a direct
 * disk read at `secondary_base + offset` instead of failing the call:
 * the string may span pages the faulting process never touched, and
 * refusing to read it would make SPAWN spuriously fail for perfectly
 * valid callers.
 */

use crate::error::KernelError;
use crate::machine::{Disk, Mmu, Mode};

pub fn copy_name_string<S: Mmu + Disk>(
    machine: &S,
    mode: Mode,
    addr: u32,
    secondary_base: u64,
    max_len: usize,
) -> Result<String, KernelError> {
    let mut name = String::new();
    for offset in 0..max_len {
        let byte = match machine.read(addr + offset as u32, mode) {
            Ok(byte) => byte,
            Err(_) => {
                let mut buf = [0u8; 1];
                machine.read_block(secondary_base + offset as u64, &mut buf)?;
                buf[0]
            }
        };
        if byte == 0 {
            return Ok(name);
        }
        name.push(byte as char);
    }
    Err(KernelError::SpawnLoadFailed(
        "program name exceeds the maximum length without a terminator",
    ))
}
