//! Runtime - executes commands and feeds results back into the update loop
//!
//! The model is only touched on the thread that owns the `Runtime`. Store
//! calls run on worker threads and report back over an mpsc channel, the same
//! way every other side effect returns as a `Msg`.

use std::collections::VecDeque;
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use crate::clipboard::{ClipboardProvider, SystemClipboard};
use crate::commands::Cmd;
use crate::commit::UpdateRequest;
use crate::config::GridConfig;
use crate::grid::{CellCoord, ColumnFilters};
use crate::keymap::{load_default_keymap, Command, KeyAction, KeyContext, Keymap, Keystroke};
use crate::messages::{CommitMsg, GridMsg, Msg, SessionMsg};
use crate::model::GridModel;
use crate::store::{FetchError, RecordStore};
use crate::update::update;

pub struct Runtime {
    model: GridModel,
    keymap: Keymap,
    store: Arc<dyn RecordStore>,
    clipboard: Box<dyn ClipboardProvider>,
    msg_tx: Sender<Msg>,
    msg_rx: Receiver<Msg>,
    /// Async results not yet received
    pending: usize,
    /// Last cell a command asked to focus
    focus: Option<CellCoord>,
}

impl Runtime {
    /// Load the initial baseline and build a session around it
    ///
    /// `query` is the server-side filter passed to every fetch, including refreshes.
    pub fn open(
        store: Arc<dyn RecordStore>,
        config: GridConfig,
        query: Option<ColumnFilters>,
    ) -> Result<Self, FetchError> {
        let records = store.list(query.as_ref())?;
        tracing::info!(records = records.len(), "initial baseline loaded");

        let mut model = GridModel::with_baseline(config, records)?;
        model.query = query;

        let (msg_tx, msg_rx) = mpsc::channel();
        Ok(Self {
            model,
            keymap: Keymap::with_bindings(load_default_keymap()),
            store,
            clipboard: Box::new(SystemClipboard),
            msg_tx,
            msg_rx,
            pending: 0,
            focus: None,
        })
    }

    pub fn with_keymap(mut self, keymap: Keymap) -> Self {
        self.keymap = keymap;
        self
    }

    pub fn with_clipboard(mut self, clipboard: impl ClipboardProvider + 'static) -> Self {
        self.clipboard = Box::new(clipboard);
        self
    }

    pub fn model(&self) -> &GridModel {
        &self.model
    }

    pub fn keymap(&self) -> &Keymap {
        &self.keymap
    }

    /// Cell the most recent navigation asked the view to focus
    pub fn focused_cell(&self) -> Option<&CellCoord> {
        self.focus.as_ref()
    }

    /// Number of async results still outstanding
    pub fn pending(&self) -> usize {
        self.pending
    }

    /// Run one message through update and execute the resulting command.
    /// Returns whether the grid needs a redraw.
    pub fn dispatch(&mut self, msg: Msg) -> bool {
        let Some(cmd) = update(&mut self.model, msg) else {
            return false;
        };
        if let Some(coord) = cmd.focus_target() {
            self.focus = Some(coord.clone());
        }
        let needs_redraw = cmd.needs_redraw();
        self.process_cmd(cmd);
        needs_redraw
    }

    pub fn dispatch_command(&mut self, command: Command) -> bool {
        let mut needs_redraw = false;
        for msg in command.to_msgs() {
            needs_redraw |= self.dispatch(msg);
        }
        needs_redraw
    }

    /// Resolve a keystroke through the keymap
    ///
    /// Unbound printable keys type into the active cell while mass-editing.
    pub fn handle_keystroke(&mut self, keystroke: Keystroke) -> bool {
        let ctx = KeyContext::from_model(&self.model);
        match self.keymap.handle_keystroke(keystroke, Some(&ctx)) {
            KeyAction::Execute(command) => {
                tracing::debug!(target: "keymap", %keystroke, ?command, "execute");
                self.dispatch_command(command)
            }
            KeyAction::NoMatch => match keystroke.printable_char() {
                Some(ch) if ctx.mass_edit => self.dispatch(Msg::type_char(ch)),
                _ => false,
            },
        }
    }

    /// Drain results that have already arrived without blocking
    pub fn process_async_messages(&mut self) -> bool {
        let mut needs_redraw = false;
        while let Ok(msg) = self.msg_rx.try_recv() {
            needs_redraw |= self.receive(msg);
        }
        needs_redraw
    }

    /// Block until every outstanding async result has been applied.
    /// Returns false if the timeout expired first.
    pub fn wait_idle(&mut self, timeout: Duration) -> bool {
        let deadline = Instant::now() + timeout;
        while self.pending > 0 {
            let remaining = deadline.saturating_duration_since(Instant::now());
            match self.msg_rx.recv_timeout(remaining) {
                Ok(msg) => {
                    self.receive(msg);
                }
                Err(RecvTimeoutError::Timeout) => return false,
                Err(RecvTimeoutError::Disconnected) => break,
            }
        }
        true
    }

    fn receive(&mut self, msg: Msg) -> bool {
        if msg.is_async_result() {
            self.pending = self.pending.saturating_sub(1);
        }
        self.dispatch(msg)
    }

    fn process_cmd(&mut self, cmd: Cmd) {
        match cmd {
            Cmd::None | Cmd::Redraw | Cmd::FocusCell(_) => {}
            Cmd::FetchRecords { filter } => {
                self.pending += 1;
                let store = Arc::clone(&self.store);
                let tx = self.msg_tx.clone();
                std::thread::spawn(move || {
                    let result = store.list(filter.as_ref());
                    let _ = tx.send(Msg::Session(SessionMsg::RecordsLoaded(result)));
                });
            }
            Cmd::UpdateRecords(requests) => {
                self.pending += requests.len();
                self.spawn_update_workers(requests);
            }
            Cmd::ReadClipboard => match self.clipboard.read_text() {
                Some(text) => {
                    self.dispatch(Msg::Grid(GridMsg::Paste(text)));
                }
                None => tracing::debug!("paste ignored, clipboard empty"),
            },
            Cmd::WriteClipboard(text) => {
                if !self.clipboard.write_text(&text) {
                    self.model.set_status("Could not write to the clipboard");
                }
            }
            Cmd::Batch(cmds) => {
                for cmd in cmds {
                    self.process_cmd(cmd);
                }
            }
        }
    }

    /// Run the per-record updates on a bounded pool of worker threads.
    /// Results arrive in completion order, not request order.
    fn spawn_update_workers(&self, requests: Vec<UpdateRequest>) {
        let workers = self
            .model
            .config
            .max_parallel_updates
            .max(1)
            .min(requests.len());
        let queue = Arc::new(Mutex::new(VecDeque::from(requests)));
        tracing::debug!(workers, "starting update workers");

        for _ in 0..workers {
            let queue = Arc::clone(&queue);
            let store = Arc::clone(&self.store);
            let tx = self.msg_tx.clone();
            std::thread::spawn(move || loop {
                let next = match queue.lock() {
                    Ok(mut queue) => queue.pop_front(),
                    Err(poisoned) => poisoned.into_inner().pop_front(),
                };
                let Some(request) = next else {
                    break;
                };

                let result = store.update(&request.record, &request.fields);
                if let Err(e) = &result {
                    tracing::warn!(record = %request.record, "update failed: {}", e);
                }
                let msg = Msg::Commit(CommitMsg::RecordUpdated {
                    batch: request.batch,
                    record: request.record,
                    result,
                });
                if tx.send(msg).is_err() {
                    break;
                }
            });
        }
    }
}
