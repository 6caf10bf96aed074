use std::borrow::Cow;
use std::error::Error as StdError;

use http::StatusCode;

use crate::coder::{Coder, DefaultCoder};
use crate::error::WithCode;
use crate::registry::Registry;

impl Registry {
    /// Extract the coder of `err`
    ///
    /// An annotated error lends its own coder. Any other error gets an
    /// unknown coder carrying the error's display string. Only `err` itself
    /// is inspected, not its sources.
    pub fn parse_coder<'a>(&self, err: Option<&'a (dyn StdError + 'static)>) -> Option<Cow<'a, DefaultCoder>> {
        err.map(|err| self.coder_of(err))
    }

    /// Coder of an error that is known to be present
    ///
    /// Same rules as [`Registry::parse_coder`].
    pub fn coder_of<'a>(&self, err: &'a (dyn StdError + 'static)) -> Cow<'a, DefaultCoder> {
        match err.downcast_ref::<WithCode>() {
            Some(annotated) => Cow::Borrowed(annotated.coder()),
            None => Cow::Owned(DefaultCoder::unknown(self, err.to_string())),
        }
    }

    /// Code of `err`
    ///
    /// No error maps to the success code, errors without a code to the
    /// unknown code.
    pub fn code_of(&self, err: Option<&(dyn StdError + 'static)>) -> u32 {
        match err {
            None => self.settings().success_code,
            Some(err) => err
                .downcast_ref::<WithCode>()
                .map_or_else(|| self.settings().unknown_code(), Coder::code),
        }
    }

    /// Whether the *code* of `err` equals `status`
    ///
    /// The resolved HTTP status is not consulted. This only means "the HTTP
    /// status is `status`" for errors whose code mirrors their status, such
    /// as those built with [`new_http_code`](crate::new_http_code) or
    /// registered codes chosen equal to their status.
    pub fn is_http_status(&self, err: Option<&(dyn StdError + 'static)>, status: StatusCode) -> bool {
        self.code_of(err) == u32::from(status.as_u16())
    }
}

/// Extract the coder of `err` using the global registry's settings
///
/// See [`Registry::parse_coder`].
pub fn parse_coder<'a>(err: Option<&'a (dyn StdError + 'static)>) -> Option<Cow<'a, DefaultCoder>> {
    Registry::global().parse_coder(err)
}

/// Code of `err` using the global registry's settings
///
/// See [`Registry::code_of`].
pub fn code_of(err: Option<&(dyn StdError + 'static)>) -> u32 {
    Registry::global().code_of(err)
}

/// Whether the code of `err` equals `status`, using the global registry's
/// settings
///
/// See [`Registry::is_http_status`].
pub fn is_http_status(err: Option<&(dyn StdError + 'static)>, status: StatusCode) -> bool {
    Registry::global().is_http_status(err, status)
}
