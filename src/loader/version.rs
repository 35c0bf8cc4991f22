use std::ffi::c_int;
use std::fmt;

pub const GL_MAJOR_VERSION: u32 = 0x821B;
pub const GL_MINOR_VERSION: u32 = 0x821C;

/// Lowest major version that can report itself through `GL_MAJOR_VERSION`.
pub const MIN_QUERYABLE_MAJOR: u32 = 3;

/// `APIENTRY` is `__stdcall` on 32-bit Windows and the C convention elsewhere.
pub type GetIntegervFn = unsafe extern "system" fn(pname: u32, data: *mut c_int);

/// Driver-reported API version, compared major first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct GlVersion {
    pub major: u32,
    pub minor: u32,
}

impl GlVersion {
    pub const fn new(major: u32, minor: u32) -> Self {
        Self { major, minor }
    }

    pub fn supports(self, major: u32, minor: u32) -> bool {
        self >= GlVersion::new(major, minor)
    }

    /// Queries both version integers; `None` before OpenGL 3.0, where the
    /// query leaves its output untouched.
    ///
    /// # Safety
    /// `get_integerv` must be a valid `glGetIntegerv` and a context must be current.
    pub unsafe fn query(get_integerv: GetIntegervFn) -> Option<Self> {
        let mut major: c_int = 0;
        let mut minor: c_int = 0;
        get_integerv(GL_MAJOR_VERSION, &mut major);
        get_integerv(GL_MINOR_VERSION, &mut minor);

        if major <= 0 || minor < 0 {
            return None;
        }
        Some(Self::new(major as u32, minor as u32))
    }
}

impl fmt::Display for GlVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.major, self.minor)
    }
}
