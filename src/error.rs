use thiserror::Error;

#[derive(Debug, Error)]
pub enum WmError {
    #[error("cannot open display: {0:?}")]
    Connection(xcb::ConnError),

    #[error("another window manager is already running")]
    AnotherWmRunning,

    #[error("client registry is full ({capacity} clients)")]
    CapacityExceeded { capacity: usize },

    #[error("cannot find a root window on the default screen")]
    NoScreen,

    #[error("X connection error: {0:?}")]
    Xcb(xcb::Error),
}

impl From<xcb::Error> for WmError {
    fn from(e: xcb::Error) -> Self {
        Self::Xcb(e)
    }
}
