mod automation;
mod chat;
mod reminder_scheduler;

pub use automation::{
    AutomationEvent, HttpAutomationNotifier, IAutomationNotifier, InMemoryAutomationNotifier,
};
pub use chat::{
    IChatClient, InMemoryChatClient, InlineKeyboard, InlineKeyboardButton, OutboundChatCall,
    TelegramClient,
};
pub use reminder_scheduler::ReminderScheduler;
