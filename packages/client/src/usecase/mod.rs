//! UseCase 層
//!
//! 会話ストアを実装するレイヤー。
//! UI 層（セッションループ）から呼び出され、Domain 層を操作します。

pub mod conversation_store;
pub mod error;

pub use conversation_store::{ConversationStore, ConversationView};
pub use error::StoreError;
