use super::client::EngineClient;
use super::generic::{fetch, FetchOutcome, FetchRequest};
use super::EngineError;
use serde_json::Value;
use std::sync::mpsc::Sender;
use std::thread;

#[derive(Debug, Clone, PartialEq)]
pub struct SetVariableRequest {
    pub environment: String,
    pub instance_id: String,
    pub name: String,
    pub value: Value,
    pub type_name: String,
    /// Table generation the edit was started against.
    pub generation: u64,
    pub row: usize,
    pub column: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeleteRequest {
    pub environment: String,
    pub instance_id: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum EngineJob {
    Fetch(FetchRequest),
    SetVariable(SetVariableRequest),
    DeleteInstance(DeleteRequest),
}

impl EngineJob {
    pub fn environment(&self) -> &str {
        match self {
            Self::Fetch(request) => &request.environment,
            Self::SetVariable(request) => &request.environment,
            Self::DeleteInstance(request) => &request.environment,
        }
    }
}

/// Exactly one reply is produced per job.
#[derive(Debug, Clone, PartialEq)]
pub enum EngineReply {
    Fetched {
        generation: u64,
        result: Result<FetchOutcome, EngineError>,
    },
    VariableSaved {
        request: SetVariableRequest,
        result: Result<(), EngineError>,
    },
    InstanceDeleted {
        instance_id: String,
        result: Result<(), EngineError>,
    },
}

pub fn run_job(client: &EngineClient, job: EngineJob) -> EngineReply {
    match job {
        EngineJob::Fetch(request) => EngineReply::Fetched {
            generation: request.generation,
            result: fetch(client, &request),
        },
        EngineJob::SetVariable(request) => {
            let result = client.set_variable(
                &request.instance_id,
                &request.name,
                &request.value,
                &request.type_name,
            );
            EngineReply::VariableSaved { request, result }
        }
        EngineJob::DeleteInstance(request) => EngineReply::InstanceDeleted {
            result: client.delete_instance(&request.instance_id),
            instance_id: request.instance_id,
        },
    }
}

/// Runs the job on its own thread; the reply is dropped if the receiver is gone.
pub fn spawn_job(client: EngineClient, job: EngineJob, tx: Sender<EngineReply>) {
    thread::spawn(move || {
        let reply = run_job(&client, job);
        let _ = tx.send(reply);
    });
}
