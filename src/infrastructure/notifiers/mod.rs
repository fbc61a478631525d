pub mod email;
pub mod factory;
pub mod sound;

pub use email::EmailNotifier;
pub use factory::NotifierFactory;
pub use sound::SoundNotifier;
