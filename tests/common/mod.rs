#![allow(dead_code)]

use std::future::Future;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use nervekit::{
    Component, ComponentError, Emitter, Event, EventKind, Service, ServiceConfig, Stats,
    StatsError, StatsReporter, StatsSource, Wiring,
};
use tokio::sync::broadcast;

/// Shared, ordered record of calls made on fakes.
pub type Journal = Arc<Mutex<Vec<String>>>;

pub fn journal() -> Journal {
    Arc::new(Mutex::new(Vec::new()))
}

pub fn entries(journal: &Journal) -> Vec<String> {
    journal.lock().unwrap().clone()
}

#[derive(Default, Clone)]
pub struct FakeOptions {
    pub wait_for_ready: bool,
    pub wait_for_end: bool,
    pub attach_fails: bool,
    pub init_fails: bool,
    pub exit_fails: bool,
    pub journal: Option<Journal>,
}

/// Component that signals immediately unless told to wait.
pub struct FakeComponent {
    wiring: Wiring,
    opts: FakeOptions,
    inits: AtomicUsize,
    exits: AtomicUsize,
}

impl FakeComponent {
    pub fn new(name: &str) -> Arc<Self> {
        Self::with(name, FakeOptions::default())
    }

    pub fn with(name: &str, opts: FakeOptions) -> Arc<Self> {
        Arc::new(Self {
            wiring: Wiring::new(name),
            opts,
            inits: AtomicUsize::new(0),
            exits: AtomicUsize::new(0),
        })
    }

    pub fn fire(&self, event: &str) {
        self.wiring.fire(event).unwrap();
    }

    pub fn fire_ready(&self) {
        self.fire("ready");
    }

    pub fn fire_end(&self) {
        self.fire("end");
    }

    pub fn inits(&self) -> usize {
        self.inits.load(Ordering::SeqCst)
    }

    pub fn exits(&self) -> usize {
        self.exits.load(Ordering::SeqCst)
    }

    fn note(&self, what: &str) {
        if let Some(j) = &self.opts.journal {
            j.lock().unwrap().push(format!("{}:{what}", self.wiring.name()));
        }
    }
}

impl Component for FakeComponent {
    fn name(&self) -> &str {
        self.wiring.name()
    }

    fn attach(&self, emitter: Emitter) -> Result<(), ComponentError> {
        if self.opts.attach_fails {
            return Err(ComponentError::failed("fake attach error"));
        }
        self.wiring.attach(emitter);
        Ok(())
    }

    fn init(&self) -> Result<(), ComponentError> {
        self.inits.fetch_add(1, Ordering::SeqCst);
        self.note("init");
        if self.opts.init_fails {
            return Err(ComponentError::failed("fake init error"));
        }
        if !self.opts.wait_for_ready {
            self.fire_ready();
        }
        Ok(())
    }

    fn exit(&self) -> Result<(), ComponentError> {
        self.exits.fetch_add(1, Ordering::SeqCst);
        self.note("exit");
        if self.opts.exit_fails {
            return Err(ComponentError::failed("fake exit error"));
        }
        if !self.opts.wait_for_end {
            self.fire_end();
        }
        Ok(())
    }
}

/// Reporter that records its calls.
pub struct FakeReporter {
    journal: Journal,
    source: Mutex<Option<StatsSource>>,
}

impl FakeReporter {
    pub fn new(journal: Journal) -> Arc<Self> {
        Arc::new(Self {
            journal,
            source: Mutex::new(None),
        })
    }

    pub fn read(&self) -> Option<Stats> {
        self.source.lock().unwrap().as_ref().map(|f| f())
    }
}

impl StatsReporter for FakeReporter {
    fn attach(&self, source: StatsSource) -> Result<(), StatsError> {
        self.journal.lock().unwrap().push("stats:attach".into());
        *self.source.lock().unwrap() = Some(source);
        Ok(())
    }

    fn init(&self) -> Result<(), StatsError> {
        self.journal.lock().unwrap().push("stats:init".into());
        Ok(())
    }

    fn exit(&self) -> Result<(), StatsError> {
        self.journal.lock().unwrap().push("stats:exit".into());
        Ok(())
    }
}

pub fn service(cfg: ServiceConfig, components: &[Arc<FakeComponent>]) -> Service {
    Service::builder(cfg)
        .with_components(components.iter().map(|c| c.clone() as nervekit::ComponentRef))
        .build()
        .unwrap()
}

/// Every event already queued on `rx`.
pub fn drain(rx: &mut broadcast::Receiver<Event>) -> Vec<Event> {
    let mut out = Vec::new();
    while let Ok(ev) = rx.try_recv() {
        out.push(ev);
    }
    out
}

pub fn topics(events: &[Event]) -> Vec<String> {
    events.iter().map(|e| e.topic().into_owned()).collect()
}

pub fn count(events: &[Event], kind: EventKind) -> usize {
    events.iter().filter(|e| e.kind == kind).count()
}

/// Receives events until one of `kind` arrives (inclusive).
pub async fn recv_until(rx: &mut broadcast::Receiver<Event>, kind: EventKind) -> Vec<Event> {
    within(async {
        let mut out = Vec::new();
        loop {
            let ev = rx.recv().await.unwrap();
            let done = ev.kind == kind;
            out.push(ev);
            if done {
                return out;
            }
        }
    })
    .await
}

/// Polls `cond` until it holds.
pub async fn eventually(cond: impl Fn() -> bool) {
    within(async {
        while !cond() {
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
    })
    .await
}

/// Lets spawned tasks run until they block.
pub async fn settle() {
    for _ in 0..10 {
        tokio::task::yield_now().await;
    }
}

pub async fn within<F: Future>(fut: F) -> F::Output {
    tokio::time::timeout(Duration::from_secs(5), fut)
        .await
        .expect("timed out")
}
