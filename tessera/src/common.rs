//! Grid types shared with the rest of the workspace.

pub use common::bit_buffer2::BitBuffer2;
pub use common::buffer2::{Border, Buffer2};
