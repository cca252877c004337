//! Cell factories, canonical naming, and the build cache.
//!
//! A [`CellFactory`] pairs a build closure with an explicit parameter
//! schema, so parameter validation and settings recording never depend on
//! runtime signature inspection. [`build_cell`] computes the canonical name
//! for an invocation, consults an injected [`CellCache`], and on a miss
//! builds, decorates, and records the component before caching it. Two
//! calls with the same factory and parameters return the identical
//! component.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use arcstr::ArcStr;

use crate::component::Component;
use crate::error::{Error, Result};
use crate::name::{component_name, hash8, ParamValue, Params, MAX_NAME_LENGTH};
use crate::pins::{add_component_pins, Decorate};

/// A decorator run on a freshly built component before it is cached.
pub type MarkerFn = Arc<dyn Fn(&mut Component) + Send + Sync>;

/// The build closure of a cell factory.
pub type BuildFn = dyn Fn(&Params) -> Result<Component> + Send + Sync;

/// The declared schema of one factory parameter.
#[derive(Debug, Clone)]
pub struct ParamSpec {
    /// The parameter name.
    pub name: ArcStr,
    /// The declared default, if any.
    ///
    /// Defaults are merged into the recorded settings of every component
    /// the factory builds; parameters without defaults are recorded only
    /// when explicitly supplied.
    pub default: Option<ParamValue>,
}

/// A parameterized cell generator: a build closure plus the metadata needed
/// to name, validate, and record its invocations.
#[derive(Clone)]
pub struct CellFactory {
    name: ArcStr,
    module: ArcStr,
    params: Vec<ParamSpec>,
    accepts_extra: bool,
    build: Arc<BuildFn>,
}

impl std::fmt::Debug for CellFactory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CellFactory")
            .field("name", &self.name)
            .field("module", &self.module)
            .field("params", &self.params)
            .field("accepts_extra", &self.accepts_extra)
            .finish_non_exhaustive()
    }
}

impl CellFactory {
    /// Creates a factory with an empty parameter schema.
    pub fn new(
        name: impl Into<ArcStr>,
        module: impl Into<ArcStr>,
        build: impl Fn(&Params) -> Result<Component> + Send + Sync + 'static,
    ) -> Self {
        Self {
            name: name.into(),
            module: module.into(),
            params: Vec::new(),
            accepts_extra: false,
            build: Arc::new(build),
        }
    }

    /// Declares a parameter with an optional default.
    pub fn with_param(
        mut self,
        name: impl Into<ArcStr>,
        default: Option<ParamValue>,
    ) -> Self {
        self.params.push(ParamSpec {
            name: name.into(),
            default,
        });
        self
    }

    /// Marks the factory as accepting parameters beyond its declared
    /// schema, disabling unknown-parameter validation.
    pub fn accepts_extra(mut self) -> Self {
        self.accepts_extra = true;
        self
    }

    /// The identifying name of this factory.
    #[inline]
    pub fn name(&self) -> &ArcStr {
        &self.name
    }

    /// The declared parameter schema.
    #[inline]
    pub fn params(&self) -> &[ParamSpec] {
        &self.params
    }
}

/// Options controlling one [`build_cell`] invocation.
#[derive(Clone)]
pub struct CellOptions {
    /// An explicit name, used verbatim instead of the canonical name.
    pub name: Option<ArcStr>,
    /// Consult and populate the cache. Defaults to true.
    pub cache: bool,
    /// Append a short process-unique suffix to the name, bypassing cache
    /// semantics for this call.
    pub uid: bool,
    /// Run the marker pipeline on the freshly built component before it is
    /// cached.
    pub pins: bool,
    /// The marker function to run when `pins` is set. Defaults to
    /// [`add_component_pins`] with default decoration.
    pub pins_fn: Option<MarkerFn>,
    /// Parameter names that must never influence the computed name.
    ///
    /// The parameters still reach the factory and the recorded settings.
    pub ignore_from_name: Vec<ArcStr>,
}

impl Default for CellOptions {
    fn default() -> Self {
        Self {
            name: None,
            cache: true,
            uid: false,
            pins: false,
            pins_fn: None,
            ignore_from_name: Vec::new(),
        }
    }
}

impl CellOptions {
    /// The default options: caching on, no uid, no pins.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets an explicit name.
    pub fn named(mut self, name: impl Into<ArcStr>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Disables the cache for this call.
    pub fn uncached(mut self) -> Self {
        self.cache = false;
        self
    }

    /// Appends a process-unique suffix to the name.
    pub fn with_uid(mut self) -> Self {
        self.uid = true;
        self
    }

    /// Runs the marker pipeline on the built component.
    pub fn with_pins(mut self) -> Self {
        self.pins = true;
        self
    }

    /// Excludes the given parameter names from name computation.
    pub fn ignoring(mut self, keys: impl IntoIterator<Item = impl Into<ArcStr>>) -> Self {
        self.ignore_from_name
            .extend(keys.into_iter().map(Into::into));
        self
    }
}

/// A memoization table from canonical cell name to built component.
///
/// Deliberately not a process global: the cache is injected into
/// [`build_cell`] so callers (and tests) control cache lifetime and
/// isolation. Entries are never evicted during a run.
#[derive(Debug, Clone, Default)]
pub struct CellCache {
    cells: HashMap<ArcStr, Arc<Component>>,
}

impl CellCache {
    /// Creates a new, empty cache.
    pub fn new() -> Self {
        Default::default()
    }

    /// Looks up a component by canonical name.
    pub fn get(&self, name: &str) -> Option<&Arc<Component>> {
        self.cells.get(name)
    }

    /// Stores a component under the given canonical name.
    pub fn insert(&mut self, name: impl Into<ArcStr>, cell: Arc<Component>) {
        self.cells.insert(name.into(), cell);
    }

    /// The number of cached components.
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Whether the cache is empty.
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Removes all cached components.
    pub fn clear(&mut self) {
        self.cells.clear();
    }
}

static UID_COUNTER: AtomicU64 = AtomicU64::new(0);

/// A short process-unique suffix (8 hex characters).
fn unique_suffix() -> String {
    let n = UID_COUNTER.fetch_add(1, Ordering::Relaxed);
    hash8(&format!("uid-{n}"))
}

/// Builds (or retrieves) the component for one factory invocation.
///
/// The canonical name is a pure function of the factory identity and the
/// supplied parameters (minus [`CellOptions::ignore_from_name`]); when
/// caching is enabled and the name is already present, the cached component
/// is returned without invoking the factory. On a miss the factory is
/// invoked with the explicit parameters only, the resolved name and merged
/// settings are recorded on the result, optional markers are stamped, and
/// the component is cached.
///
/// A canonical name longer than [`MAX_NAME_LENGTH`] is replaced on the
/// component by `{factory}_{8-hex-char hash}`; the long form remains both
/// the cache key and the component's [`name_long`](Component::name_long)
/// metadata, so lookups stay collision-free.
///
/// # Errors
///
/// Returns [`Error::UnknownParam`] when a parameter is not declared by the
/// factory (and the factory does not accept extras). Nothing is cached on
/// any error path.
pub fn build_cell(
    cache: &mut CellCache,
    factory: &CellFactory,
    params: Params,
    options: &CellOptions,
) -> Result<Arc<Component>> {
    if !factory.accepts_extra {
        for key in params.keys() {
            if !factory.params.iter().any(|spec| &spec.name == key) {
                let valid: Vec<ArcStr> =
                    factory.params.iter().map(|spec| spec.name.clone()).collect();
                tracing::error!(
                    "`{}` got an unexpected parameter `{}`; valid parameters are {:?}",
                    factory.name,
                    key,
                    valid
                );
                return Err(Error::UnknownParam {
                    factory: factory.name.clone(),
                    key: key.clone(),
                    valid,
                });
            }
        }
    }

    let mut canonical = match &options.name {
        Some(name) => name.to_string(),
        None => component_name(&factory.name, &params, &options.ignore_from_name),
    };
    if options.uid {
        canonical = format!("{canonical}_{}", unique_suffix());
    }

    if options.cache {
        if let Some(cell) = cache.get(&canonical) {
            tracing::debug!(name = %canonical, "cell cache hit");
            return Ok(cell.clone());
        }
    }
    tracing::debug!(name = %canonical, factory = %factory.name, "building cell");

    let mut component = (factory.build)(&params)?;

    if canonical.len() > MAX_NAME_LENGTH {
        let short = format!("{}_{}", factory.name, hash8(&canonical));
        tracing::debug!(long = %canonical, short = %short, "cell name over length limit");
        component.set_name_long(canonical.as_str());
        component.set_name(short);
    } else {
        component.set_name(canonical.as_str());
    }

    let settings = component.settings_mut();
    settings.function_name = Some(factory.name.clone());
    settings.module = Some(factory.module.clone());
    for spec in &factory.params {
        if let Some(default) = &spec.default {
            settings.full.insert(spec.name.clone(), default.clone());
        }
    }
    for (key, value) in &params {
        settings.full.insert(key.clone(), value.clone());
        settings.changed.insert(key.clone(), value.clone());
    }

    if options.pins {
        match &options.pins_fn {
            Some(pins_fn) => pins_fn(&mut component),
            None => add_component_pins(&mut component, &Decorate::default()),
        }
    }

    let component = Arc::new(component);
    if options.cache {
        cache.insert(canonical, component.clone());
    }
    Ok(component)
}
