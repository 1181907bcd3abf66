use xgo_lib::Orchestrator;
use xgo_lib::cache::{CacheOutcome, DepCache, HttpFetcher};
use xgo_lib::compose::Entry;

use super::common::{RecordingRuntime, Workspace};

#[test]
fn module_build_with_vendor_and_proxy() {
  let ws = Workspace::new();
  ws.write("build/go.mod", "module example.com/app\n\ngo 1.21\n");
  std::fs::create_dir_all(ws.repo().join("vendor")).unwrap();

  let mut request = ws.request("1.21");
  request.config.modules = true;
  request.config.module_proxy = Some("https://proxy.example".to_string());

  let runtime = RecordingRuntime::default();
  let cache = DepCache::new(ws.cache(), HttpFetcher::new().unwrap());
  let report = Orchestrator::new(&runtime, cache).run(&request).unwrap();

  assert!(report.executed);
  assert!(runtime.pulls.borrow().is_empty());

  let runs = runtime.runs.borrow();
  assert_eq!(runs.len(), 1);
  let inv = &runs[0];

  assert_eq!(inv.env_value("GO111MODULE"), Some("on"));
  assert_eq!(inv.env_value("FLAG_MOD"), Some("vendor"));
  assert_eq!(inv.env_value("GOPROXY"), Some("https://proxy.example"));

  let build_root = inv.mounts().find(|m| m.container == "/build").unwrap();
  let source = inv.mounts().find(|m| m.container == "/source").unwrap();
  assert_eq!(build_root.host, ws.build());
  assert_eq!(source.host, ws.build());

  let repo = ws.repo().to_string_lossy().into_owned();
  assert_eq!(inv.positional(), vec!["crazymax/xgo:1.21", repo.as_str()]);
  assert!(matches!(
    &inv.entries[inv.entries.len() - 2..],
    [Entry::Arg { .. }, Entry::Arg { .. }]
  ));
}

#[test]
fn dependencies_are_downloaded_once_over_http() {
  let ws = Workspace::new();
  let mut server = mockito::Server::new();
  let mock = server
    .mock("GET", "/releases/gmp-6.1.0.tar.bz2")
    .with_status(200)
    .with_body("gmp-archive")
    .expect(1)
    .create();

  let url = format!("{}/releases/gmp-6.1.0.tar.bz2", server.url());
  let mut request = ws.request("1.21");
  request.config.dependencies = vec![url.clone()];

  let runtime = RecordingRuntime::default();
  let orchestrator = Orchestrator::new(&runtime, DepCache::new(ws.cache(), HttpFetcher::new().unwrap()));

  let first = orchestrator.run(&request).unwrap();
  let second = orchestrator.run(&request).unwrap();

  mock.assert();
  assert_eq!(first.dependencies[0].outcome, CacheOutcome::Fetched { bytes: 11 });
  assert_eq!(second.dependencies[0].outcome, CacheOutcome::Hit);
  assert_eq!(first.dependencies[0].path, ws.cache().join("gmp-6.1.0.tar.bz2"));
  assert_eq!(
    std::fs::read_to_string(ws.cache().join("gmp-6.1.0.tar.bz2")).unwrap(),
    "gmp-archive"
  );

  let runs = runtime.runs.borrow();
  assert_eq!(runs[0].env_value("DEPS"), Some(url.as_str()));
  let cache_mount = runs[0].mounts().find(|m| m.container == "/deps-cache").unwrap();
  assert!(cache_mount.read_only);
  assert_eq!(cache_mount.host, ws.cache());
}

#[test]
fn http_error_aborts_before_container_run() {
  let ws = Workspace::new();
  let mut server = mockito::Server::new();
  let _mock = server.mock("GET", "/missing.tar.gz").with_status(404).create();

  let mut request = ws.request("1.21");
  request.config.dependencies = vec![format!("{}/missing.tar.gz", server.url())];

  let runtime = RecordingRuntime::default();
  let orchestrator = Orchestrator::new(&runtime, DepCache::new(ws.cache(), HttpFetcher::new().unwrap()));

  let err = orchestrator.run(&request).unwrap_err();

  assert_eq!(err.stage, xgo_lib::Stage::PopulateCache);
  assert!(err.to_string().contains("HTTP 404"));
  assert!(runtime.runs.borrow().is_empty());
  assert!(!ws.cache().join("missing.tar.gz").exists());
}

#[test]
fn custom_image_is_pulled_when_absent() {
  let ws = Workspace::new();
  let mut request = ws.request("1.21");
  request.image.image = Some("pinned:abc".to_string());
  request.image.repo = Some("myorg/xgo".to_string());

  let runtime = RecordingRuntime::default();
  let orchestrator = Orchestrator::new(&runtime, DepCache::new(ws.cache(), HttpFetcher::new().unwrap()));

  let report = orchestrator.run(&request).unwrap();

  assert!(report.pulled);
  assert_eq!(*runtime.pulls.borrow(), vec!["pinned:abc".to_string()]);
  assert_eq!(runtime.runs.borrow()[0].positional()[0], "pinned:abc");
}
