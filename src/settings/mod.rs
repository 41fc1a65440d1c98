pub mod fragment_size;

pub use fragment_size::{
    default_upload_fragment_size, get_upload_fragment_size, set_upload_fragment_size,
    FRAGMENT_SIZE_ALIGNMENT, MAX_UPLOAD_FRAGMENT_SIZE, MIN_UPLOAD_FRAGMENT_SIZE,
};
