//! Transmission sinks
//!
//! An interface never touches a wire. Every frame it emits goes to the
//! [`FrameSink`] it was built with.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;
use std::sync::mpsc::Sender;

use tracing::trace;

use crate::link::EthernetFrame;

/// Outbound side of a link. Transmission is assumed to succeed.
pub trait FrameSink {
    fn transmit(&mut self, frame: EthernetFrame);
}

impl<F> FrameSink for F
where
    F: FnMut(EthernetFrame),
{
    fn transmit(&mut self, frame: EthernetFrame) {
        self(frame)
    }
}

impl FrameSink for Sender<EthernetFrame> {
    fn transmit(&mut self, frame: EthernetFrame) {
        if self.send(frame).is_err() {
            trace!("frame receiver gone, dropping frame");
        }
    }
}

/// Shared FIFO of transmitted frames.
///
/// Clones share the same queue, so one handle can be given to an interface
/// while another is used to collect what it sent. Single-threaded only.
#[derive(Debug, Clone, Default)]
pub struct FrameQueue {
    frames: Rc<RefCell<VecDeque<EthernetFrame>>>,
}

impl FrameQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pop(&self) -> Option<EthernetFrame> {
        self.frames.borrow_mut().pop_front()
    }

    /// Take everything queued so far.
    pub fn drain(&self) -> Vec<EthernetFrame> {
        self.frames.borrow_mut().drain(..).collect()
    }

    pub fn len(&self) -> usize {
        self.frames.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.borrow().is_empty()
    }
}

impl FrameSink for FrameQueue {
    fn transmit(&mut self, frame: EthernetFrame) {
        self.frames.borrow_mut().push_back(frame);
    }
}
