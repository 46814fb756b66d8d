//! UseCase: 会話ストア
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - ConversationStore の append_local / append_remote / select_room / current_view
//!
//! ### なぜこのテストが必要か
//! - ローカル送信（楽観的エコー）とリモート受信が同じ順序付きログに入ることを保証
//! - ルーム切り替えがログを変更しないことを保証
//! - 送信時に Transport へ同じ内容が 1 回だけ渡されることを確認
//!
//! ### どのような状況を想定しているか
//! - 正常系：ローカル送信、リモート受信、ルーム切り替え
//! - 異常系：存在しないルームへの切り替え
//! - エッジケース：空文字・空白のみの入力

use std::sync::Arc;

use crate::domain::{
    ClockLabel, ConversationLog, Message, MessageText, MessageTransport, RoomCatalog, RoomName,
    Sender,
};

use super::error::StoreError;

/// Read model handed to the presentation layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConversationView<'a> {
    pub active_room: &'a RoomName,
    /// Global log, not filtered by room.
    pub messages: &'a [Message],
}

/// Single source of truth for the visible history and the active room.
///
/// Every mutation goes through `append_local`, `append_remote` or
/// `select_room`, all called from the one session task, so append order is
/// program order.
pub struct ConversationStore {
    /// Outbound transport（Infrastructure 層の抽象化）
    transport: Arc<dyn MessageTransport>,
    local_sender: Sender,
    catalog: RoomCatalog,
    active_room: RoomName,
    log: ConversationLog,
}

impl ConversationStore {
    /// Create a store with an empty log; the first room of the catalog is
    /// active.
    pub fn new(
        transport: Arc<dyn MessageTransport>,
        local_sender: Sender,
        catalog: RoomCatalog,
    ) -> Self {
        let active_room = catalog.default_room().clone();
        Self {
            transport,
            local_sender,
            catalog,
            active_room,
            log: ConversationLog::new(),
        }
    }

    /// Append a message typed on this client and hand it to the transport.
    ///
    /// Blank input (after trimming) is ignored and `None` is returned. The
    /// stored text is the raw input. The local copy is never reconciled with
    /// anything the transport may echo back.
    pub fn append_local(&mut self, raw_text: &str) -> Option<&Message> {
        let text = MessageText::new(raw_text.to_string()).ok()?;
        let message = Message::new(text, self.local_sender.clone(), ClockLabel::now());

        self.transport.send(&message);
        self.log.append(message);

        tracing::debug!(len = self.log.len(), "appended local message");
        self.log.last()
    }

    /// Append a message delivered by the transport, verbatim.
    ///
    /// A `Message` can only be built from a well-formed payload, so there is
    /// nothing left to check here. No deduplication is done.
    pub fn append_remote(&mut self, message: Message) -> &Message {
        tracing::debug!(sender = %message.sender(), "appended remote message");
        self.log.append(message);
        &self.log.as_slice()[self.log.len() - 1]
    }

    /// Switch the active room. The log is left untouched.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::UnknownRoom` if `name` is not in the room set; the
    /// active room does not change in that case.
    pub fn select_room(&mut self, name: &str) -> Result<&RoomName, StoreError> {
        let room = self
            .catalog
            .resolve(name)
            .map_err(|_| StoreError::UnknownRoom(name.trim().to_string()))?
            .clone();

        if room != self.active_room {
            tracing::info!(from = %self.active_room, to = %room, "switched room");
        }
        self.active_room = room;
        Ok(&self.active_room)
    }

    pub fn current_view(&self) -> ConversationView<'_> {
        ConversationView {
            active_room: &self.active_room,
            messages: self.log.as_slice(),
        }
    }

    pub fn active_room(&self) -> &RoomName {
        &self.active_room
    }

    pub fn rooms(&self) -> &[RoomName] {
        self.catalog.rooms()
    }

    pub fn local_sender(&self) -> &Sender {
        &self.local_sender
    }

    /// Whether `message` was authored under the local identity.
    pub fn is_own(&self, message: &Message) -> bool {
        message.sender() == &self.local_sender
    }
}
