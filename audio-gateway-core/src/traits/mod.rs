pub mod audio_channel;
pub mod codec_engine;
