//! Double-buffered `f32` storage.
//!
//! [`PingPongBuffer`] holds two equally sized buffers. The *front* buffer is
//! the current value; the *back* buffer is scratch for a pass that must not
//! observe its own writes. After such a pass, [`swap`](PingPongBuffer::swap)
//! promotes the back buffer to front. The stale buffer is kept for reuse, so
//! repeated passes never allocate.

/// Two `f32` buffers alternating between front (readable) and back
/// (writable) roles.
#[derive(Clone, Debug)]
pub struct PingPongBuffer {
    front: Vec<f32>,
    back: Vec<f32>,
}

impl PingPongBuffer {
    /// Create a zeroed buffer pair of `len` slots each.
    pub fn zeroed(len: usize) -> Self {
        Self {
            front: vec![0.0; len],
            back: vec![0.0; len],
        }
    }

    /// Number of slots per buffer.
    pub fn len(&self) -> usize {
        self.front.len()
    }

    /// Whether the buffers hold zero slots.
    pub fn is_empty(&self) -> bool {
        self.front.is_empty()
    }

    /// The current values.
    pub fn front(&self) -> &[f32] {
        &self.front
    }

    /// Mutable access to the current values, for in-place passes.
    pub fn front_mut(&mut self) -> &mut [f32] {
        &mut self.front
    }

    /// Borrow the front buffer for reading and the back buffer for writing.
    ///
    /// The back buffer's contents are unspecified; a pass must overwrite
    /// every slot before calling [`swap`](Self::swap).
    pub fn split(&mut self) -> (&[f32], &mut [f32]) {
        (&self.front, &mut self.back)
    }

    /// Promote the back buffer to front.
    pub fn swap(&mut self) {
        std::mem::swap(&mut self.front, &mut self.back);
    }

    /// Zero both buffers.
    pub fn clear(&mut self) {
        self.front.fill(0.0);
        self.back.fill(0.0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn split_reads_front_writes_back() {
        let mut buf = PingPongBuffer::zeroed(3);
        buf.front_mut().copy_from_slice(&[1.0, 2.0, 3.0]);
        {
            let (src, dst) = buf.split();
            for (d, s) in dst.iter_mut().zip(src) {
                *d = s * 10.0;
            }
        }
        // Writes to the back buffer are invisible until swap.
        assert_eq!(buf.front(), &[1.0, 2.0, 3.0]);
        buf.swap();
        assert_eq!(buf.front(), &[10.0, 20.0, 30.0]);
    }

    #[test]
    fn repeated_passes_chain() {
        let mut buf = PingPongBuffer::zeroed(1);
        buf.front_mut()[0] = 1.0;
        for _ in 0..4 {
            let (src, dst) = buf.split();
            dst[0] = src[0] * 2.0;
            buf.swap();
        }
        assert_eq!(buf.front()[0], 16.0);
    }

    #[test]
    fn clear_zeroes_both() {
        let mut buf = PingPongBuffer::zeroed(2);
        buf.front_mut().fill(5.0);
        buf.swap();
        buf.front_mut().fill(7.0);
        buf.clear();
        assert!(buf.front().iter().all(|&v| v == 0.0));
        buf.swap();
        assert!(buf.front().iter().all(|&v| v == 0.0));
    }
}
