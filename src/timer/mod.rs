//! 计时层
//!
//! - [`Countdown`] - 由外部节拍驱动的可取消倒计时
//! - [`Ticker`] - 基于 tokio interval 的周期性节拍源

pub mod countdown;
pub mod ticker;

pub use countdown::{Countdown, CountdownEvent, CountdownHandle};
pub use ticker::Ticker;
