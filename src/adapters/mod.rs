pub mod feed_events;

pub use feed_events::LoggingFeedEventEmitter;
