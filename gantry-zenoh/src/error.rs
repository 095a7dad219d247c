use thiserror::Error;

#[derive(Error, Debug)]
pub enum BusError {
    #[error("zenoh bus failure {0:?}")]
    Zenoh(#[from] zenoh::Error),
}
