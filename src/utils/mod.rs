pub mod short_code;
pub mod url_validator;

pub use short_code::{SHORT_CODE_LENGTH, generate_short_code};
pub use url_validator::{UrlValidationError, extract_domain, parse_hostname};
