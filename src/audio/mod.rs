pub mod decode;
pub mod metadata;

pub use decode::{decode_audio, AudioData};
pub use metadata::{extract_metadata, SongMetadata};
