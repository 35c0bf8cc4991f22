//! Fixed skeletons of the generated `OpenGL.h` / `OpenGL.c` pair.

use super::{Fragments, BIND_FUNCTION};
use crate::config::Platform;

pub struct HeaderTemplate<'a> {
    pub platform: Platform,
    /// Path of the API header as written in `#include <...>`.
    pub include: &'a str,
    pub guard: String,
}

impl<'a> HeaderTemplate<'a> {
    pub fn new(platform: Platform, include: &'a str, header_name: &str) -> Self {
        let guard = header_name
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() { c.to_ascii_uppercase() } else { '_' })
            .collect::<String>();
        Self {
            platform,
            include,
            guard: format!("COREGL_{guard}"),
        }
    }

    fn export_macro(&self) -> &'static str {
        match self.platform {
            Platform::Windows => {
                "#if defined(OPENGL_EXPORTS)\n\
                 \x20   #define OpenGLAPI __declspec(dllexport)\n\
                 #else\n\
                 \x20   #define OpenGLAPI __declspec(dllimport)\n\
                 #endif\n"
            }
            Platform::Linux | Platform::MacOs => {
                "#if defined(OPENGL_EXPORTS)\n\
                 \x20   #define OpenGLAPI __attribute__((visibility(\"default\")))\n\
                 #else\n\
                 \x20   #define OpenGLAPI\n\
                 #endif\n"
            }
        }
    }

    fn system_includes(&self) -> &'static str {
        match self.platform {
            Platform::Windows => {
                "#ifndef WIN32_LEAN_AND_MEAN\n\
                 \x20   #define WIN32_LEAN_AND_MEAN\n\
                 #endif\n\
                 #include <windows.h>\n"
            }
            Platform::Linux | Platform::MacOs => "",
        }
    }

    pub fn render(&self, fragments: &Fragments) -> String {
        format!(
            "/* Generated by coregl. Do not edit. */\n\
             \n\
             #ifndef {guard}\n\
             #define {guard}\n\
             \n\
             {export}\
             \n\
             #include <stdbool.h>\n\
             #include <stddef.h>\n\
             {system}\
             #include <{include}>\n\
             \n\
             #ifdef __cplusplus\n\
             extern \"C\" {{\n\
             #endif\n\
             \n\
             {declarations}\
             \n\
             OpenGLAPI bool glLoadFunctions(void);\n\
             OpenGLAPI void* glGetFunctionPointer(const char* name);\n\
             OpenGLAPI bool glIsSupported(int major, int minor);\n\
             \n\
             #ifdef __cplusplus\n\
             }}\n\
             #endif\n\
             \n\
             #endif /* {guard} */\n",
            guard = self.guard,
            export = self.export_macro(),
            system = self.system_includes(),
            include = self.include,
            declarations = fragments.declarations,
        )
    }
}

pub struct SourceTemplate<'a> {
    pub header_name: &'a str,
}

impl<'a> SourceTemplate<'a> {
    pub fn new(header_name: &'a str) -> Self {
        Self { header_name }
    }

    pub fn render(&self, fragments: &Fragments) -> String {
        format!(
            "/* Generated by coregl. Do not edit. */\n\
             \n\
             #include \"{header}\"\n\
             \n\
             extern bool coregl_load_functions(void);\n\
             extern void* coregl_get_function_pointer(const char* name);\n\
             extern bool coregl_is_supported(int major, int minor);\n\
             \n\
             {bindings}\
             \n\
             OpenGLAPI void* glGetFunctionPointer(const char* name)\n\
             {{\n\
             \x20   return coregl_get_function_pointer(name);\n\
             }}\n\
             \n\
             OpenGLAPI bool glLoadFunctions(void)\n\
             {{\n\
             \x20   if (!coregl_load_functions())\n\
             \x20       return false;\n\
             \n\
             \x20   {bind}();\n\
             \x20   return true;\n\
             }}\n\
             \n\
             OpenGLAPI bool glIsSupported(int major, int minor)\n\
             {{\n\
             \x20   return coregl_is_supported(major, minor);\n\
             }}\n",
            header = self.header_name,
            bindings = fragments.bindings,
            bind = BIND_FUNCTION,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fragments() -> Fragments {
        Fragments {
            declarations: "#define glFlush _cglptr_glFlush\n".to_string(),
            bindings: "static void _cglBindFunctions(void)\n{\n}\n".to_string(),
        }
    }

    #[test]
    fn header_guard_from_file_name() {
        let template = HeaderTemplate::new(Platform::Linux, "GL/glcorearb.h", "OpenGL.h");
        assert_eq!(template.guard, "COREGL_OPENGL_H");
    }

    #[test]
    fn linux_header() {
        let header = HeaderTemplate::new(Platform::Linux, "GL/glcorearb.h", "OpenGL.h")
            .render(&fragments());
        assert!(header.contains("#include <GL/glcorearb.h>\n"));
        assert!(header.contains("#include <stddef.h>\n"));
        assert!(header.contains("visibility(\"default\")"));
        assert!(!header.contains("windows.h"));
        assert!(header.contains("#define glFlush _cglptr_glFlush\n"));
        assert!(header.contains("OpenGLAPI bool glLoadFunctions(void);"));
        assert!(header.ends_with("#endif /* COREGL_OPENGL_H */\n"));
    }

    #[test]
    fn windows_header() {
        let header = HeaderTemplate::new(Platform::Windows, "GL/glcorearb.h", "OpenGL.h")
            .render(&fragments());
        assert!(header.contains("__declspec(dllimport)"));
        let windows = header.find("#include <windows.h>").unwrap();
        let gl = header.find("#include <GL/glcorearb.h>").unwrap();
        assert!(windows < gl);
    }

    #[test]
    fn source_calls_bind_function_after_load() {
        let source = SourceTemplate::new("OpenGL.h").render(&fragments());
        assert!(source.contains("#include \"OpenGL.h\""));
        let load = source.find("if (!coregl_load_functions())").unwrap();
        let bind = source.find("    _cglBindFunctions();").unwrap();
        assert!(load < bind);
    }
}
