use rusqlite::Connection;
use tokio::sync::mpsc;

use super::StorageCommand;
use super::queries;

pub(super) fn run_worker(conn: Connection, mut cmd_rx: mpsc::Receiver<StorageCommand>) {
    while let Some(cmd) = cmd_rx.blocking_recv() {
        match cmd {
            StorageCommand::GetValue { key, reply } => {
                let result = queries::get_value(&conn, &key);
                let _ = reply.send(result);
            }
            StorageCommand::SetValue { key, value, reply } => {
                let result = queries::set_value(&conn, &key, &value);
                let _ = reply.send(result);
            }
        }
    }
}
