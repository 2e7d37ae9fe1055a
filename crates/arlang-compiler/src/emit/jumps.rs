//! Loop label management.
//!
//! Each open loop remembers its top offset and the guard branch that still
//! needs its exit target patched.

use arlang_core::CompileError;

/// Handle for an open loop, returned by
/// [`Emitter::begin_loop`](super::Emitter::begin_loop).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LoopLabel {
    id: u32,
}

#[derive(Debug)]
struct LoopFrame {
    label: LoopLabel,
    top: usize,
    /// Address of the guard branch, once emitted.
    guard: Option<usize>,
}

/// Stack of open loops, innermost last.
#[derive(Debug, Default)]
pub struct LoopStack {
    loops: Vec<LoopFrame>,
    next_id: u32,
}

impl LoopStack {
    pub fn new() -> Self {
        Self::default()
    }

    /// Open a loop whose back-edge returns to `top`.
    pub fn enter(&mut self, top: usize) -> LoopLabel {
        let label = LoopLabel { id: self.next_id };
        self.next_id += 1;
        self.loops.push(LoopFrame {
            label,
            top,
            guard: None,
        });
        label
    }

    /// Offset of the loop top for `label`.
    pub fn top(&self, label: LoopLabel, operation: &'static str) -> Result<usize, CompileError> {
        Ok(self.innermost(label, operation)?.top)
    }

    /// Record the guard branch of `label`. A loop has at most one guard.
    pub fn set_guard(
        &mut self,
        label: LoopLabel,
        at: usize,
        operation: &'static str,
    ) -> Result<(), CompileError> {
        let frame = self.innermost_mut(label, operation)?;
        if frame.guard.is_some() {
            return Err(CompileError::EmitterState {
                operation,
                reason: "the loop already has a guard",
            });
        }
        frame.guard = Some(at);
        Ok(())
    }

    /// Close `label`, returning its guard branch address if one was emitted.
    pub fn exit(&mut self, label: LoopLabel) -> Result<Option<usize>, CompileError> {
        self.innermost(label, "end loop")?;
        Ok(self.loops.pop().and_then(|frame| frame.guard))
    }

    pub fn depth(&self) -> usize {
        self.loops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.loops.is_empty()
    }

    fn innermost(&self, label: LoopLabel, operation: &'static str) -> Result<&LoopFrame, CompileError> {
        match self.loops.last() {
            Some(frame) if frame.label == label => Ok(frame),
            _ => Err(Self::not_innermost(label, &self.loops, operation)),
        }
    }

    fn innermost_mut(
        &mut self,
        label: LoopLabel,
        operation: &'static str,
    ) -> Result<&mut LoopFrame, CompileError> {
        let error = Self::not_innermost(label, &self.loops, operation);
        match self.loops.last_mut() {
            Some(frame) if frame.label == label => Ok(frame),
            _ => Err(error),
        }
    }

    fn not_innermost(label: LoopLabel, loops: &[LoopFrame], operation: &'static str) -> CompileError {
        let reason = if loops.iter().any(|frame| frame.label == label) {
            "the label does not belong to the innermost open loop"
        } else {
            "the label's loop is not open"
        };
        CompileError::EmitterState { operation, reason }
    }
}
