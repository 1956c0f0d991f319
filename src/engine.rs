//! The compiler facade binding a catalog, options and registrar
//!
//! `Compiler` is the main entry point: it compiles WHERE-style filter
//! strings and full SELECT statements against one field catalog.
//! `CachingCompiler` adds an LRU cache over filter compilation for
//! callers that re-run the same filters against changing record sets.

use crate::error::Result;
use crate::functions::FunctionRegistrar;
use crate::semantic::{self, CompileOptions, CompiledFilter, SelectStatement, UnparseOptions};
use crate::types::FieldCatalog;
use lru::LruCache;
use std::num::NonZeroUsize;
use std::sync::Arc;

/// Default capacity for the filter cache
const DEFAULT_CACHE_CAPACITY: usize = 1000;

/// Compiles expressions and select statements against a field catalog.
pub struct Compiler<'a> {
    catalog: &'a FieldCatalog,
    options: CompileOptions,
    registrar: Option<&'a dyn FunctionRegistrar>,
}

impl<'a> Compiler<'a> {
    pub fn new(catalog: &'a FieldCatalog) -> Self {
        Compiler {
            catalog,
            options: CompileOptions::default(),
            registrar: None,
        }
    }

    /// Replaces the compile options.
    pub fn with_options(mut self, options: CompileOptions) -> Self {
        self.options = options;
        self
    }

    /// Attaches a custom function registrar; implies nothing by itself,
    /// the allow-custom-functions option still gates lookups.
    pub fn with_registrar(mut self, registrar: &'a dyn FunctionRegistrar) -> Self {
        self.registrar = Some(registrar);
        self
    }

    pub fn options(&self) -> &CompileOptions {
        &self.options
    }

    pub fn catalog(&self) -> &FieldCatalog {
        self.catalog
    }

    /// Compiles a WHERE-style filter string into a checked tree.
    pub fn compile_filter(&self, text: &str) -> Result<CompiledFilter> {
        semantic::compile_filter(text, self.catalog, &self.options, self.registrar)
    }

    /// Compiles a SELECT statement string, including any UNION ALL chain.
    pub fn compile_select(&self, text: &str) -> Result<SelectStatement> {
        semantic::compile_select(text, self.catalog, &self.options, self.registrar)
    }

    /// Renders a compiled filter back to canonical text.
    pub fn unparse(&self, filter: &CompiledFilter) -> String {
        semantic::unparse(&filter.expr, self.catalog, &self.options.unparse_options())
    }

    /// Unparse options matching the compile options, for callers that
    /// render expressions themselves.
    pub fn unparse_options(&self) -> UnparseOptions {
        self.options.unparse_options()
    }
}

/// A caching wrapper around filter compilation, maintaining an LRU cache
/// of compiled filters to avoid redundant parsing.
pub struct CachingCompiler<'a> {
    compiler: Compiler<'a>,
    cache: LruCache<String, Arc<CompiledFilter>>,
}

impl<'a> CachingCompiler<'a> {
    /// Create a caching compiler with the default capacity.
    pub fn new(compiler: Compiler<'a>) -> Self {
        Self::with_capacity(compiler, DEFAULT_CACHE_CAPACITY)
    }

    /// Create a caching compiler with the given capacity.
    pub fn with_capacity(compiler: Compiler<'a>, capacity: usize) -> Self {
        Self {
            compiler,
            cache: LruCache::new(
                NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::new(100).unwrap()),
            ),
        }
    }

    /// Compile a filter with caching. Keys are normalized by trimming.
    pub fn compile_filter(&mut self, text: &str) -> Result<Arc<CompiledFilter>> {
        let normalized = text.trim().to_string();
        if let Some(filter) = self.cache.get(&normalized) {
            return Ok(filter.clone());
        }
        let filter = Arc::new(self.compiler.compile_filter(text)?);
        self.cache.put(normalized, filter.clone());
        Ok(filter)
    }

    /// Clear the cache.
    pub fn clear(&mut self) {
        self.cache.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{DataType, TableDef, PRIMARY_TABLE};

    fn catalog() -> FieldCatalog {
        let mut catalog = FieldCatalog::new(TableDef::new("mem", "cities"));
        catalog.add_field(PRIMARY_TABLE, "name", DataType::Str);
        catalog.add_field(PRIMARY_TABLE, "population", DataType::F64);
        catalog
    }

    #[test]
    fn test_caching_compiler_reuses_trees() {
        let catalog = catalog();
        let mut caching = CachingCompiler::new(Compiler::new(&catalog));

        let first = caching.compile_filter("population > 1000").unwrap();
        let second = caching.compile_filter("  population > 1000  ").unwrap();
        assert!(Arc::ptr_eq(&first, &second));

        caching.clear();
        let third = caching.compile_filter("population > 1000").unwrap();
        assert!(!Arc::ptr_eq(&first, &third));
        assert_eq!(*first, *third);
    }
}
