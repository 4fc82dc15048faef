//! Network actor - runs wallet and ledger operations on the Tokio runtime

use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::task::JoinSet;

use crate::messages::{NetworkCommand, NetworkResponse};
use crate::remote::RemoteStateClient;
use crate::wallet::WalletSession;

/// Network actor that executes controller commands and reports outcomes
pub struct NetworkActor {
    wallet: Arc<WalletSession>,
    remote: Arc<RemoteStateClient>,
    response_tx: mpsc::UnboundedSender<NetworkResponse>,
    active_tasks: JoinSet<()>,
}

impl NetworkActor {
    pub fn new(
        wallet: Arc<WalletSession>,
        remote: Arc<RemoteStateClient>,
        response_tx: mpsc::UnboundedSender<NetworkResponse>,
    ) -> Self {
        NetworkActor {
            wallet,
            remote,
            response_tx,
            active_tasks: JoinSet::new(),
        }
    }

    /// Run the network actor message loop
    pub async fn run(mut self, mut cmd_rx: mpsc::UnboundedReceiver<NetworkCommand>) {
        loop {
            tokio::select! {
                biased;

                cmd = cmd_rx.recv() => {
                    match cmd {
                        Some(NetworkCommand::Shutdown) | None => {
                            self.active_tasks.abort_all();
                            break;
                        }
                        Some(cmd) => self.spawn(cmd),
                    }
                }

                // Reap finished tasks
                Some(result) = self.active_tasks.join_next() => {
                    if let Err(e) = result {
                        if e.is_panic() {
                            tracing::error!(error = %e, "Network task panicked");
                        }
                    }
                }
            }
        }
        tracing::info!("Network actor stopped");
    }

    fn spawn(&mut self, cmd: NetworkCommand) {
        let wallet = Arc::clone(&self.wallet);
        let remote = Arc::clone(&self.remote);
        let response_tx = self.response_tx.clone();
        let name = cmd.name();

        self.active_tasks.spawn(async move {
            tracing::info!(command = name, "Executing");
            if let Some(response) = execute(cmd, &wallet, &remote).await {
                tracing::info!(command = name, id = response.id(), "Completed");
                let _ = response_tx.send(response);
            }
        });
    }
}

/// Run one command to completion
async fn execute(
    cmd: NetworkCommand,
    wallet: &WalletSession,
    remote: &RemoteStateClient,
) -> Option<NetworkResponse> {
    let response = match cmd {
        NetworkCommand::ProbeSession { id } => NetworkResponse::Session {
            id,
            result: wallet.probe_existing_session().await,
        },
        NetworkCommand::RequestSession { id } => NetworkResponse::Session {
            id,
            result: wallet.request_session().await,
        },
        NetworkCommand::FetchCollection { id } => NetworkResponse::Collection {
            id,
            result: remote.fetch_collection().await,
        },
        NetworkCommand::InitializeAccount { id, session } => {
            let result = match wallet.signer_for(&session) {
                Ok(signer) => remote.initialize_account(&signer).await,
                Err(e) => Err(e.into()),
            };
            NetworkResponse::Initialized { id, result }
        }
        NetworkCommand::AppendItem { id, link, session } => {
            let result = match wallet.signer_for(&session) {
                Ok(signer) => remote.append_item(&link, &signer).await,
                Err(e) => Err(e.into()),
            };
            NetworkResponse::Appended { id, result }
        }
        NetworkCommand::Shutdown => return None,
    };

    if let Some(e) = response_error(&response) {
        tracing::warn!(id = response.id(), error = %e, "Operation failed");
    }
    Some(response)
}

fn response_error(response: &NetworkResponse) -> Option<String> {
    match response {
        NetworkResponse::Session { result: Err(e), .. } => Some(e.to_string()),
        NetworkResponse::Collection { result: Err(e), .. } => Some(e.to_string()),
        NetworkResponse::Initialized { result: Err(e), .. } => Some(e.to_string()),
        NetworkResponse::Appended { result: Err(e), .. } => Some(e.to_string()),
        _ => None,
    }
}
