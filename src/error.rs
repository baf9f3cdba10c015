//! Types for error handling go here.
use std::io::Error as IOError;

quick_error! {
    /// Error type for all error variants originated by this crate.
    #[derive(Debug)]
    pub enum NiftiError {
        /// The buffer cannot even hold a NIfTI-1 header.
        TooSmall(len: usize) {
            display("File is too small to be a valid NIFTI file ({} bytes, at least 348 expected)", len)
        }
        /// None of the header validity checks passed.
        InvalidFormat {
            display("Not a valid NIFTI file or unsupported format")
        }
        /// The file was rejected before reading (compressed input).
        UnsupportedFormat(name: String) {
            display("Compressed NIFTI files are not supported, please use an uncompressed .nii file: {}", name)
        }
        /// Slice extraction or rasterization failed.
        RenderFailure(reason: String) {
            display("Failed to render slice: {}", reason)
        }
        /// Unrecognized anatomical plane name.
        InvalidPlane(name: String) {
            display("Unknown viewing plane `{}`", name)
        }
        /// I/O Error
        Io(err: IOError) {
            from()
            source(err)
            display("I/O error: {}", err)
        }
    }
}

/// Alias type for results originated from this crate.
pub type Result<T> = ::std::result::Result<T, NiftiError>;
