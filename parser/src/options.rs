//! Parser configuration. Kept as a plain struct with a `Default` impl and
//! `with_*` builder methods rather than a kitchen-sink config threaded
//! everywhere, the way the teacher's `ParserContext::new` takes a small
//! bundle of flags instead of an options object passed to every call.

/// Which edition's grammar to accept. Newer syntax (optional chaining,
/// nullish coalescing, numeric separators, `for await`, …) is gated behind
/// the matching edition.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum EcmaVersion {
    Es3,
    Es5,
    Es2015,
    Es2016,
    Es2017,
    Es2018,
    Es2019,
    Es2020,
    Es2021,
    Latest,
}

impl EcmaVersion {
    /// Numeric year/edition value used for simple `>=` gating, matching the
    /// convention of comparing against a year number (2015, 2020, ...).
    pub fn as_year(self) -> u32 {
        match self {
            EcmaVersion::Es3 => 3,
            EcmaVersion::Es5 => 5,
            EcmaVersion::Es2015 => 2015,
            EcmaVersion::Es2016 => 2016,
            EcmaVersion::Es2017 => 2017,
            EcmaVersion::Es2018 => 2018,
            EcmaVersion::Es2019 => 2019,
            EcmaVersion::Es2020 => 2020,
            EcmaVersion::Es2021 => 2021,
            EcmaVersion::Latest => 2021,
        }
    }

    pub fn supports_optional_chaining(self) -> bool {
        self.as_year() >= 2020
    }

    pub fn supports_numeric_separators(self) -> bool {
        self.as_year() >= 2021
    }

    pub fn supports_bigint(self) -> bool {
        self.as_year() >= 2020
    }

    pub fn supports_nullish_coalescing(self) -> bool {
        self.as_year() >= 2020
    }

    pub fn supports_for_await(self) -> bool {
        self.as_year() >= 2018
    }

    pub fn supports_async(self) -> bool {
        self.as_year() >= 2017
    }

    pub fn supports_object_spread(self) -> bool {
        self.as_year() >= 2018
    }

    pub fn supports_template(self) -> bool {
        self.as_year() >= 2015
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum SourceType {
    Script,
    Module,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum AllowReserved {
    Yes,
    No,
    /// Reject even as a property name, the strictest tier.
    Never,
}

#[derive(Clone, Debug)]
pub struct ParserOptions {
    pub ecma_version: EcmaVersion,
    pub source_type: SourceType,
    pub allow_reserved: AllowReserved,
    pub allow_return_outside_function: bool,
    pub allow_import_export_everywhere: bool,
    pub allow_await_outside_function: bool,
    pub allow_hash_bang: bool,
    pub source_file: Option<String>,
}

impl Default for ParserOptions {
    fn default() -> Self {
        ParserOptions {
            ecma_version: EcmaVersion::Latest,
            source_type: SourceType::Script,
            allow_reserved: AllowReserved::Yes,
            allow_return_outside_function: false,
            allow_import_export_everywhere: false,
            allow_await_outside_function: false,
            allow_hash_bang: true,
            source_file: None,
        }
    }
}

impl ParserOptions {
    pub fn with_ecma_version(mut self, v: EcmaVersion) -> Self {
        self.ecma_version = v;
        self
    }

    pub fn with_source_type(mut self, t: SourceType) -> Self {
        self.source_type = t;
        if t == SourceType::Module {
            self.allow_await_outside_function = false;
        }
        self
    }

}
