use bss_output::OutputError;
use bss_sim::SimError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ReplicaError {
    #[error("replica configuration error: {0}")]
    Config(String),

    #[error("replica {sim_num} failed: {source}")]
    Sim {
        sim_num: usize,
        #[source]
        source:  SimError,
    },

    #[error(transparent)]
    Output(#[from] OutputError),
}

pub type ReplicaResult<T> = Result<T, ReplicaError>;
