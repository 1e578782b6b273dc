//! Write bodies as clients send them, turned into engine inputs.

use api_types::{IdInput, TextInput, cash_flow::DecimalInput};
use engine::FieldErrors;

use crate::ServerError;

/// Reads the loosely typed fields of a write body, collecting type errors.
#[derive(Default)]
pub(crate) struct Fields {
    errors: FieldErrors,
}

impl Fields {
    fn read<V, T>(
        &mut self,
        field: &str,
        value: Option<V>,
        convert: impl FnOnce(V) -> Result<T, String>,
    ) -> Option<T> {
        match convert(value?) {
            Ok(value) => Some(value),
            Err(message) => {
                self.errors.add(field, message);
                None
            }
        }
    }

    pub(crate) fn id(&mut self, field: &str, value: Option<IdInput>) -> Option<i32> {
        self.read(field, value, IdInput::into_id)
    }

    pub(crate) fn text(&mut self, field: &str, value: Option<TextInput>) -> Option<String> {
        self.read(field, value, TextInput::into_text)
    }

    pub(crate) fn decimal(&mut self, field: &str, value: Option<DecimalInput>) -> Option<String> {
        self.read(field, value, DecimalInput::into_text)
    }

    /// Hand back `input`, or fail with every type error recorded so far.
    pub(crate) fn finish<T>(self, input: T) -> Result<T, ServerError> {
        self.errors.into_result()?;
        Ok(input)
    }
}
