#![allow(dead_code)]

use std::sync::{
    Mutex,
    atomic::{
        AtomicU32,
        AtomicU64,
        AtomicUsize,
        Ordering,
    },
};

use tick::{
    CycleCounter,
    InterruptRegistry,
    PortIo,
    Processor,
    Scheduler,
    TaskStatus,
};

/// Simulated processor with a cycle counter that moves only when told to,
/// plus `step` cycles on every read.
pub struct Platform {
    cycles: AtomicU64,
    step: u64,
    serializing: bool,
    plain_reads: AtomicUsize,
    serializing_reads: AtomicUsize,
    frequency: AtomicU32,
    id: AtomicUsize,
    boot_id: usize,
    halts: AtomicUsize,
    cycles_per_halt: AtomicU64,
}

impl Platform {
    pub fn new(cpu_mhz: u32) -> Self {
        Self {
            cycles: AtomicU64::new(0),
            step: 0,
            serializing: true,
            plain_reads: AtomicUsize::new(0),
            serializing_reads: AtomicUsize::new(0),
            frequency: AtomicU32::new(cpu_mhz),
            id: AtomicUsize::new(0),
            boot_id: 0,
            halts: AtomicUsize::new(0),
            cycles_per_halt: AtomicU64::new(0),
        }
    }

    pub fn with_step(
        mut self,
        step: u64,
    ) -> Self {
        self.step = step;
        self
    }

    pub fn without_serializing_read(mut self) -> Self {
        self.serializing = false;
        self
    }

    pub fn advance(
        &self,
        cycles: u64,
    ) {
        self.cycles.fetch_add(cycles, Ordering::SeqCst);
    }

    pub fn cycles(&self) -> u64 {
        self.cycles.load(Ordering::SeqCst)
    }

    pub fn set_frequency(
        &self,
        cpu_mhz: u32,
    ) {
        self.frequency.store(cpu_mhz, Ordering::SeqCst);
    }

    pub fn set_id(
        &self,
        id: usize,
    ) {
        self.id.store(id, Ordering::SeqCst);
    }

    pub fn advance_on_halt(
        &self,
        cycles: u64,
    ) {
        self.cycles_per_halt.store(cycles, Ordering::SeqCst);
    }

    pub fn halts(&self) -> usize {
        self.halts.load(Ordering::SeqCst)
    }

    pub fn plain_reads(&self) -> usize {
        self.plain_reads.load(Ordering::SeqCst)
    }

    pub fn serializing_reads(&self) -> usize {
        self.serializing_reads.load(Ordering::SeqCst)
    }

    fn tick(&self) -> u64 {
        self.cycles.fetch_add(self.step, Ordering::SeqCst) + self.step
    }
}

impl CycleCounter for Platform {
    fn read(&self) -> u64 {
        self.plain_reads.fetch_add(1, Ordering::SeqCst);
        self.tick()
    }

    fn read_serializing(&self) -> u64 {
        assert!(self.serializing);
        self.serializing_reads.fetch_add(1, Ordering::SeqCst);
        self.tick()
    }

    fn has_serializing_read(&self) -> bool {
        self.serializing
    }
}

impl Processor for Platform {
    fn id(&self) -> usize {
        self.id.load(Ordering::SeqCst)
    }

    fn boot_id(&self) -> usize {
        self.boot_id
    }

    fn frequency(&self) -> u32 {
        self.frequency.load(Ordering::SeqCst)
    }

    fn halt(&self) {
        self.halts.fetch_add(1, Ordering::SeqCst);
        self.advance(self.cycles_per_halt.load(Ordering::SeqCst));
    }
}

/// Scheduler which records what the wait asked from it.
pub struct RecordingScheduler<'a> {
    status: TaskStatus,
    drains: AtomicUsize,
    alarms: Mutex<Vec<u64>>,
    reschedules: AtomicUsize,
    on_drain: Box<dyn Fn() + Send + Sync + 'a>,
}

impl<'a> RecordingScheduler<'a> {
    pub fn new(status: TaskStatus) -> Self {
        Self::with_drain_hook(status, || {})
    }

    pub fn with_drain_hook(
        status: TaskStatus,
        on_drain: impl Fn() + Send + Sync + 'a,
    ) -> Self {
        Self {
            status,
            drains: AtomicUsize::new(0),
            alarms: Mutex::new(Vec::new()),
            reschedules: AtomicUsize::new(0),
            on_drain: Box::new(on_drain),
        }
    }

    pub fn drains(&self) -> usize {
        self.drains.load(Ordering::SeqCst)
    }

    pub fn alarms(&self) -> Vec<u64> {
        self.alarms.lock().unwrap().clone()
    }

    pub fn reschedules(&self) -> usize {
        self.reschedules.load(Ordering::SeqCst)
    }
}

impl Scheduler for RecordingScheduler<'_> {
    fn current_status(&self) -> TaskStatus {
        self.status
    }

    fn check_workqueues(&self) {
        self.drains.fetch_add(1, Ordering::SeqCst);
        (self.on_drain)();
    }

    fn set_alarm(
        &self,
        deadline: u64,
    ) {
        self.alarms.lock().unwrap().push(deadline);
    }

    fn reschedule(&self) {
        self.reschedules.fetch_add(1, Ordering::SeqCst);
    }
}

/// Interrupt table which remembers installed handlers.
#[derive(Default)]
pub struct Registry {
    pub handlers: Vec<(u8, fn())>,
}

impl InterruptRegistry for Registry {
    fn install(
        &mut self,
        vector: u8,
        handler: fn(),
    ) {
        self.handlers.push((vector, handler));
    }
}

/// I/O ports which remember every write.
#[derive(Default)]
pub struct Ports {
    pub writes: Vec<(u16, u8)>,
}

impl PortIo for Ports {
    fn write_u8(
        &mut self,
        port: u16,
        value: u8,
    ) {
        self.writes.push((port, value));
    }
}
