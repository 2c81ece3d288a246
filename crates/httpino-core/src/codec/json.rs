use super::{Codec, CodecError};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::io::{Read, Write};
use tracing::trace;

/// Immutable encode/decode settings shared by every operation of a store
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct CodecConfig {
    /// Indent encoded documents
    pub pretty: bool,
    /// Log every decoded input at trace level
    pub echo: bool,
}

/// serde_json backed codec
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonCodec {
    config: CodecConfig,
}

impl JsonCodec {
    pub fn new(config: CodecConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &CodecConfig {
        &self.config
    }

    pub fn to_string<T>(&self, value: &T) -> Result<String, CodecError>
    where
        T: Serialize + ?Sized,
    {
        let json = if self.config.pretty {
            serde_json::to_string_pretty(value)?
        } else {
            serde_json::to_string(value)?
        };
        Ok(json)
    }

    pub fn from_str<T>(&self, json: &str) -> Result<Option<T>, CodecError>
    where
        T: DeserializeOwned,
    {
        self.decode(json.as_bytes())
    }

    /// Encodes `value` to a stream, flushing it afterwards
    pub fn to_writer<W, T>(&self, mut writer: W, value: &T) -> Result<(), CodecError>
    where
        W: Write,
        T: Serialize + ?Sized,
    {
        self.encode(value, &mut writer)?;
        writer.flush()?;
        Ok(())
    }

    /// Decodes a stream read to its end
    pub fn from_reader<R, T>(&self, mut reader: R) -> Result<Option<T>, CodecError>
    where
        R: Read,
        T: DeserializeOwned,
    {
        let mut bytes = Vec::new();
        reader.read_to_end(&mut bytes)?;
        self.decode(&bytes)
    }
}

impl Codec for JsonCodec {
    fn encode<T>(&self, value: &T, out: &mut dyn Write) -> Result<(), CodecError>
    where
        T: Serialize + ?Sized,
    {
        if self.config.pretty {
            serde_json::to_writer_pretty(out, value)?;
        } else {
            serde_json::to_writer(out, value)?;
        }
        Ok(())
    }

    fn decode<T>(&self, bytes: &[u8]) -> Result<Option<T>, CodecError>
    where
        T: DeserializeOwned,
    {
        if self.config.echo {
            trace!(content = %String::from_utf8_lossy(bytes), "decoding document");
        }

        // serde_json rejects empty input; an empty document simply has no value
        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(None);
        }

        Ok(serde_json::from_slice::<Option<T>>(bytes)?)
    }
}
