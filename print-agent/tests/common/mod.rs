//! In-memory doubles for the POS API, the host bridge and the document
//! printer

#![allow(dead_code)]

use async_trait::async_trait;
use comanda_client::{ClientError, ClientResult, PosApi};
use comanda_printer::PrintError;
use print_agent::printing::{
    BridgeError, DocumentError, DocumentPrinter, RenderSettings, TicketRenderer, decode_payload,
};
use serde_json::{Value, json};
use shared::{JobId, PrintJob, PrinterRecord, StoreConfig};
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// POS API backed by a job list; acknowledged jobs leave the queue
#[derive(Default)]
pub struct StubApi {
    pub jobs: Mutex<Vec<PrintJob>>,
    pub printers: Mutex<Vec<Value>>,
    pub store: Mutex<Option<Value>>,
    pub marked: Mutex<Vec<String>>,
    pub printer_reads: AtomicUsize,
    pub fail_printers: AtomicBool,
    pub fail_config: AtomicBool,
    pub fail_mark: AtomicBool,
}

impl StubApi {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn push_job(&self, job: Value) {
        let job: PrintJob = serde_json::from_value(job).expect("valid job");
        self.jobs.lock().unwrap().push(job);
    }

    pub fn add_printer(&self, record: Value) {
        self.printers.lock().unwrap().push(record);
    }

    pub fn set_store(&self, config: Value) {
        *self.store.lock().unwrap() = Some(config);
    }

    pub fn marked(&self) -> Vec<String> {
        self.marked.lock().unwrap().clone()
    }

    pub fn pending_ids(&self) -> Vec<String> {
        self.jobs
            .lock()
            .unwrap()
            .iter()
            .map(|job| job.id.to_string())
            .collect()
    }
}

#[async_trait]
impl PosApi for StubApi {
    async fn pending_jobs(&self) -> ClientResult<Vec<PrintJob>> {
        Ok(self.jobs.lock().unwrap().clone())
    }

    async fn mark_complete(&self, id: &JobId) -> ClientResult<()> {
        if self.fail_mark.load(Ordering::SeqCst) {
            return Err(ClientError::Internal("queue unavailable".into()));
        }
        self.marked.lock().unwrap().push(id.to_string());
        self.jobs.lock().unwrap().retain(|job| &job.id != id);
        Ok(())
    }

    async fn printers(&self) -> ClientResult<Vec<PrinterRecord>> {
        self.printer_reads.fetch_add(1, Ordering::SeqCst);
        if self.fail_printers.load(Ordering::SeqCst) {
            return Err(ClientError::Internal("registry offline".into()));
        }
        let records = self.printers.lock().unwrap().clone();
        Ok(records
            .into_iter()
            .map(|record| serde_json::from_value(record).expect("valid printer record"))
            .collect())
    }

    async fn ticket_config(&self) -> ClientResult<StoreConfig> {
        if self.fail_config.load(Ordering::SeqCst) {
            return Err(ClientError::NotFound("configuracion-ticket".into()));
        }
        match self.store.lock().unwrap().clone() {
            Some(config) => Ok(serde_json::from_value(config)?),
            None => Ok(StoreConfig::default()),
        }
    }
}

/// A payload delivered through the bridge, already decoded
#[derive(Debug, Clone, PartialEq)]
pub struct Delivery {
    pub target: String,
    pub bytes: Vec<u8>,
}

impl Delivery {
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.bytes).into_owned()
    }
}

/// Host bridge that records deliveries instead of printing
#[derive(Default)]
pub struct RecordingBridge {
    pub deliveries: Mutex<Vec<Delivery>>,
    pub fail: AtomicBool,
    pub delay: Option<Duration>,
    pub in_flight: AtomicUsize,
    pub max_in_flight: AtomicUsize,
}

impl RecordingBridge {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn with_delay(delay: Duration) -> Arc<Self> {
        Arc::new(Self {
            delay: Some(delay),
            ..Self::default()
        })
    }

    pub fn deliveries(&self) -> Vec<Delivery> {
        self.deliveries.lock().unwrap().clone()
    }

    async fn deliver(&self, target: String, payload_b64: &str) -> Result<(), BridgeError> {
        let bytes = decode_payload(payload_b64)?;

        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        if self.fail.load(Ordering::SeqCst) {
            return Err(PrintError::Connection(format!("{} refused", target)).into());
        }
        self.deliveries.lock().unwrap().push(Delivery { target, bytes });
        Ok(())
    }
}

#[async_trait]
impl print_agent::printing::HostBridge for RecordingBridge {
    async fn print_over_network(&self, host: &str, port: u16, payload_b64: &str) -> Result<(), BridgeError> {
        self.deliver(format!("{}:{}", host, port), payload_b64).await
    }

    async fn print_via_local_driver(&self, identifier: &str, payload_b64: &str) -> Result<(), BridgeError> {
        self.deliver(format!("driver:{}", identifier), payload_b64).await
    }

    async fn list_system_printers(&self) -> Result<Vec<String>, BridgeError> {
        Ok(vec!["EPSON TM-T20II".to_string()])
    }
}

/// Document printer that keeps the documents in memory
#[derive(Default)]
pub struct RecordingDocuments {
    pub documents: Mutex<Vec<(String, String)>>,
}

impl RecordingDocuments {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn documents(&self) -> Vec<(String, String)> {
        self.documents.lock().unwrap().clone()
    }
}

#[async_trait]
impl DocumentPrinter for RecordingDocuments {
    async fn print_document(&self, label: &str, html: &str) -> Result<PathBuf, DocumentError> {
        self.documents
            .lock()
            .unwrap()
            .push((label.to_string(), html.to_string()));
        Ok(PathBuf::from(format!("{}.html", label)))
    }
}

pub fn renderer() -> Arc<TicketRenderer> {
    Arc::new(TicketRenderer::new(RenderSettings::default()))
}

pub fn network_printer(name: &str, zone: &str, host: &str) -> Value {
    json!({
        "name": name,
        "zone": zone,
        "transport": "network",
        "host": host,
        "port": 9100,
        "state": "active"
    })
}

pub fn kitchen_job(id: u64, zone: &str) -> Value {
    json!({
        "id": id,
        "zone": zone,
        "content": {
            "title": "NEW ORDER",
            "table": "5",
            "waiter": "Ana",
            "items": [
                {"qty": 2, "name": "Burger", "note": "no onion"},
                {"qty": 1, "name": "Fries"}
            ]
        }
    })
}

pub fn receipt() -> shared::ReceiptTicket {
    serde_json::from_value(json!({
        "order_id": 1001,
        "server_name": "Ana",
        "lines": [
            {"description": "Coffee", "quantity": 2, "unit_price": 1500},
            {"description": "Cake", "quantity": 1, "unit_price": 3990}
        ],
        "subtotal": 6990,
        "total": 6990,
        "payments": [{"method_name": "Cash", "amount": 10000}],
        "change_due": 3010
    }))
    .expect("valid receipt")
}
