pub mod masking;

pub use masking::mask_token;
