//! Text primitives shared by every generated artifact.
//!
//! The configuration-wizard comment syntax (`<h>`, `<o>`, `<i>`, `<n=>`
//! entries) is parsed and rewritten by an external editor, so these
//! templates are a stable output format and must not drift.

/// Start of the region the configuration wizard edits.
pub const WIZARD_START: &str =
    "//-------- <<< Use Configuration Wizard in Context Menu >>> -----------------  \n\n";

/// End of the region the configuration wizard edits.
pub const WIZARD_END: &str = "//-------- <<< end of configuration section >>> -----------------\n";

/// Include-guard macro for a file name: `pin_mapping.h` gives
/// `PIN_MAPPING_H_`.
pub fn include_guard(file_name: &str) -> String {
    let mut name: String = file_name
        .to_uppercase()
        .chars()
        .map(|c| if c == '.' || c == '-' { '_' } else { c })
        .collect();
    name.push('_');
    name
}

/// An in-memory document under construction.
#[derive(Debug, Default)]
pub struct DocumentWriter {
    text: String,
}

impl DocumentWriter {
    pub fn new() -> Self {
        Self::default()
    }

    /// The text written so far.
    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn finish(self) -> String {
        self.text
    }

    /// Append text verbatim.
    pub fn raw(&mut self, text: &str) {
        self.text.push_str(text);
    }

    pub fn blank_line(&mut self) {
        self.text.push('\n');
    }

    // --- file framing ---

    /// Doxygen file block and opening include guard.
    ///
    /// `true_file_name` is the device-specific name the file is written
    /// under, e.g. `pin_mapping-MK20D5.h`.
    pub fn header_preamble(
        &mut self,
        file_name: &str,
        true_file_name: Option<&str>,
        version: &str,
        brief: &str,
    ) {
        let derived = true_file_name
            .map(|n| format!("(derived from {n})"))
            .unwrap_or_default();
        let guard = include_guard(file_name);
        self.text.push_str(&format!(
            "/**\n * @file      {file_name} {derived}\n * @version   {version}\n * @brief     {brief}\n */\n\n#ifndef {guard}\n#define {guard}\n\n"
        ));
    }

    /// Closing include guard.
    pub fn header_postamble(&mut self, file_name: &str) {
        self.text
            .push_str(&format!("\n#endif /* {} */\n", include_guard(file_name)));
    }

    /// Doxygen file block for a source file.
    pub fn cpp_preamble(&mut self, file_name: &str, true_file_name: Option<&str>, brief: &str) {
        let from = true_file_name
            .map(|n| format!("(from {n})"))
            .unwrap_or_default();
        self.text.push_str(&format!(
            " /**\n  * @file     {file_name} {from}\n  *\n  * @brief   {brief}\n  */\n\n"
        ));
    }

    pub fn include(&mut self, file_name: &str) {
        self.text.push_str(&format!("#include \"{file_name}\"\n"));
    }

    // --- wizard metadata ---

    pub fn wizard_start(&mut self) {
        self.text.push_str(WIZARD_START);
    }

    pub fn wizard_end(&mut self) {
        self.text.push_str(WIZARD_END);
    }

    /// Open a `<h>` heading section.
    pub fn section_open(&mut self, title: &str) {
        self.text.push_str(&format!("// <h> {title}\n\n"));
    }

    pub fn section_close(&mut self) {
        self.text.push_str("// </h>\n\n");
    }

    /// Start an `<o>` selection option.
    ///
    /// `offset` selects the bit-field offset within the following macro;
    /// zero is written as no offset. Multi-line hints are continued as
    /// further `<i>` lines.
    pub fn option_preamble(&mut self, comment: Option<&str>, offset: u32, title: &str, hint: &str) {
        if let Some(comment) = comment {
            self.text.push_str(&format!("// {comment}\n"));
        }
        let offset = if offset == 0 {
            String::new()
        } else {
            offset.to_string()
        };
        let hint = hint.replace('\n', "\n//   <i> ");
        self.text
            .push_str(&format!("//   <o{offset}> {title} \n//   <i> {hint}\n"));
    }

    /// One `<value=> name` entry of a selection option.
    pub fn option_entry(&mut self, value: impl std::fmt::Display, name: &str) {
        self.text.push_str(&format!("//     <{value}=> {name}\n"));
    }

    /// The `<value=> Default` entry closing a selection option.
    pub fn option_default(&mut self, value: impl std::fmt::Display) {
        self.text.push_str(&format!("//     <{value}=> Default\n"));
    }

    // --- macros ---

    pub fn macro_definition(&mut self, name: &str, value: &str) {
        self.text.push_str(&format!("#define {name:<20} {value:<20}\n"));
    }

    /// Macro with a doxygen brief and parameter description.
    pub fn documented_macro(&mut self, brief: &str, param: &str, name: &str, value: &str) {
        self.text.push_str(&format!(
            "/**\n * @brief {brief}\n *\n * @param {param}\n */\n#define {name:<20}  {value}\n\n"
        ));
    }

    // --- doxygen groups ---

    pub fn group_start(&mut self, name: &str, title: &str, brief: &str) {
        self.text.push_str(&format!(
            "/**\n* @addtogroup {name} {title}\n* @brief {brief}\n* @{{\n*/\n"
        ));
    }

    pub fn group_close(&mut self) {
        self.text.push_str("/**\n * @}\n */\n");
    }

    // --- conditionals ---

    /// `#if <macro> == <value>`
    pub fn if_equal(&mut self, macro_name: &str, value: usize) {
        self.text.push_str(&format!("#if {macro_name} == {value}\n"));
    }

    /// `#ifndef <macro>`
    pub fn if_not_defined(&mut self, macro_name: &str) {
        self.text.push_str(&format!("#ifndef {macro_name}\n"));
    }

    pub fn endif(&mut self) {
        self.text.push_str("#endif\n");
    }
}
