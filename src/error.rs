use std::io;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error
{
    #[error("terminal: {0}")]
    Terminal(#[from] io::Error),
    #[error("{0}")]
    Usage(String),
    #[cfg_attr(not(feature = "audio"), allow(dead_code))]
    #[error("audio: {0}")]
    Audio(String),
}

pub type Result<T> = std::result::Result<T, Error>;
