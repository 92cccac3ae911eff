//! Shared test scaffolding
//!
//! `ScriptedLedger` wraps a `MemoryLedger` and lets a test override what
//! each primitive returns, count calls, and observe how many times scan
//! iterators are closed.

#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use patientledger::ledger::{
    KeyValue, LedgerError, LedgerResult, LedgerStore, MemoryLedger, StateIterator,
};
use patientledger::patient::Patient;

/// One scripted step of a range scan
pub type ScanStep = Result<KeyValue, String>;

#[derive(Default)]
struct Script {
    get_returns: Option<Result<Option<Vec<u8>>, String>>,
    put_error: Option<String>,
    put_fail_on_call: Option<usize>,
    delete_error: Option<String>,
    scan_open_error: Option<String>,
    scan_steps: Option<Vec<ScanStep>>,
}

#[derive(Default)]
pub struct ScriptedLedger {
    inner: MemoryLedger,
    script: Mutex<Script>,
    gets: AtomicUsize,
    puts: AtomicUsize,
    deletes: AtomicUsize,
    closes: Arc<AtomicUsize>,
    put_keys: Mutex<Vec<String>>,
}

impl ScriptedLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// The backing store, for seeding state or checking it afterwards.
    pub fn inner(&self) -> &MemoryLedger {
        &self.inner
    }

    pub fn get_returns(&self, value: Option<Vec<u8>>) {
        self.script.lock().unwrap().get_returns = Some(Ok(value));
    }

    pub fn get_fails(&self, message: &str) {
        self.script.lock().unwrap().get_returns = Some(Err(message.to_string()));
    }

    pub fn put_fails(&self, message: &str) {
        self.script.lock().unwrap().put_error = Some(message.to_string());
    }

    /// Fail only the `n`th put (1-based).
    pub fn put_fails_on_call(&self, n: usize, message: &str) {
        let mut script = self.script.lock().unwrap();
        script.put_fail_on_call = Some(n);
        script.put_error = Some(message.to_string());
    }

    pub fn delete_fails(&self, message: &str) {
        self.script.lock().unwrap().delete_error = Some(message.to_string());
    }

    pub fn scan_open_fails(&self, message: &str) {
        self.script.lock().unwrap().scan_open_error = Some(message.to_string());
    }

    pub fn scan_yields(&self, steps: Vec<ScanStep>) {
        self.script.lock().unwrap().scan_steps = Some(steps);
    }

    pub fn get_calls(&self) -> usize {
        self.gets.load(Ordering::SeqCst)
    }

    pub fn put_calls(&self) -> usize {
        self.puts.load(Ordering::SeqCst)
    }

    pub fn delete_calls(&self) -> usize {
        self.deletes.load(Ordering::SeqCst)
    }

    pub fn close_calls(&self) -> usize {
        self.closes.load(Ordering::SeqCst)
    }

    pub fn put_keys(&self) -> Vec<String> {
        self.put_keys.lock().unwrap().clone()
    }
}

impl LedgerStore for ScriptedLedger {
    fn get(&self, key: &str) -> LedgerResult<Option<Vec<u8>>> {
        self.gets.fetch_add(1, Ordering::SeqCst);
        match &self.script.lock().unwrap().get_returns {
            Some(Ok(value)) => Ok(value.clone()),
            Some(Err(message)) => Err(LedgerError::backend(message.clone())),
            None => self.inner.get(key),
        }
    }

    fn put(&self, key: &str, value: &[u8]) -> LedgerResult<()> {
        let call = self.puts.fetch_add(1, Ordering::SeqCst) + 1;
        {
            let script = self.script.lock().unwrap();
            if let Some(message) = &script.put_error {
                if script.put_fail_on_call.map_or(true, |n| n == call) {
                    return Err(LedgerError::backend(message.clone()));
                }
            }
        }
        self.put_keys.lock().unwrap().push(key.to_string());
        self.inner.put(key, value)
    }

    fn delete(&self, key: &str) -> LedgerResult<()> {
        self.deletes.fetch_add(1, Ordering::SeqCst);
        if let Some(message) = &self.script.lock().unwrap().delete_error {
            return Err(LedgerError::backend(message.clone()));
        }
        self.inner.delete(key)
    }

    fn range_scan(&self, start: &str, end: &str) -> LedgerResult<Box<dyn StateIterator>> {
        let script = self.script.lock().unwrap();
        if let Some(message) = &script.scan_open_error {
            return Err(LedgerError::backend(message.clone()));
        }

        let steps: Vec<ScanStep> = match &script.scan_steps {
            Some(steps) => steps.clone(),
            None => {
                let mut iter = self.inner.range_scan(start, end)?;
                let mut steps = Vec::new();
                while iter.has_next() {
                    steps.push(Ok(iter.next_entry()?));
                }
                iter.close()?;
                steps
            }
        };

        Ok(Box::new(ScriptedIterator {
            steps: steps.into(),
            closes: Arc::clone(&self.closes),
        }))
    }
}

struct ScriptedIterator {
    steps: VecDeque<ScanStep>,
    closes: Arc<AtomicUsize>,
}

impl StateIterator for ScriptedIterator {
    fn has_next(&self) -> bool {
        !self.steps.is_empty()
    }

    fn next_entry(&mut self) -> LedgerResult<KeyValue> {
        match self.steps.pop_front() {
            Some(Ok(entry)) => Ok(entry),
            Some(Err(message)) => Err(LedgerError::backend(message)),
            None => Err(LedgerError::backend("scan exhausted")),
        }
    }

    fn close(&mut self) -> LedgerResult<()> {
        self.closes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

/// A fully populated patient, distinct per `nin`.
pub fn sample_patient(nin: &str, first_name: &str) -> Patient {
    Patient {
        nin: nin.to_string(),
        first_name: first_name.to_string(),
        last_name: "Doe".to_string(),
        date_of_birth: "1990-01-01".to_string(),
        sex: "M".to_string(),
        mother_nin: "987".to_string(),
        father_nin: "876".to_string(),
        family_medical_history: "None".to_string(),
        allergy: "Peanuts".to_string(),
        chronic_illnesses: "Asthma".to_string(),
        amended_from: String::new(),
    }
}

pub fn encoded(patient: &Patient) -> Vec<u8> {
    patient.encode().expect("patient encodes")
}
