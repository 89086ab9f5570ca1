//! Diagnóstico rápido com atraso (debounce)
//!
//! Cada entrada cancela a tarefa anterior e arma uma nova. Um resultado só
//! é entregue se nenhuma entrada mais recente nem `cancel()` aconteceu
//! depois de armado.

use super::DiagnosisService;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::debug;

/// Descrições com até este número de caracteres (sem espaços nas pontas)
/// não disparam o diagnóstico rápido
pub const QUICK_DIAGNOSIS_MIN_CHARS: usize = 15;

pub struct QuickDiagnosisDebouncer {
    service: Arc<dyn DiagnosisService>,
    delay: Duration,
    generation: Arc<AtomicU64>,
    pending: Option<JoinHandle<()>>,
    hints: mpsc::UnboundedSender<String>,
}

impl QuickDiagnosisDebouncer {
    /// Devolve o debouncer e o canal por onde chegam os diagnósticos
    pub fn new(
        service: Arc<dyn DiagnosisService>,
        delay: Duration,
    ) -> (Self, mpsc::UnboundedReceiver<String>) {
        let (hints, rx) = mpsc::unbounded_channel();
        let debouncer = Self {
            service,
            delay,
            generation: Arc::new(AtomicU64::new(0)),
            pending: None,
            hints,
        };
        (debouncer, rx)
    }

    /// Nova descrição digitada; devolve true se uma chamada foi armada
    pub fn on_input(&mut self, description: &str) -> bool {
        let armed_generation = self.supersede();
        if description.trim().chars().count() <= QUICK_DIAGNOSIS_MIN_CHARS {
            return false;
        }

        let service = Arc::clone(&self.service);
        let generation = Arc::clone(&self.generation);
        let hints = self.hints.clone();
        let delay = self.delay;
        let text = description.to_string();

        self.pending = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let hint = service.quick_diagnosis(&text).await;
            if generation.load(Ordering::SeqCst) != armed_generation {
                debug!("diagnóstico rápido descartado (entrada mais recente)");
                return;
            }
            if !hint.is_empty() {
                let _ = hints.send(hint);
            }
        }));
        true
    }

    /// Cancela a chamada pendente (envio da análise completa, encerramento)
    pub fn cancel(&mut self) {
        self.supersede();
    }

    pub fn is_pending(&self) -> bool {
        self.pending.as_ref().is_some_and(|h| !h.is_finished())
    }

    /// Aborta a tarefa armada e avança a geração; devolve a nova geração
    fn supersede(&mut self) -> u64 {
        if let Some(handle) = self.pending.take() {
            handle.abort();
        }
        self.generation.fetch_add(1, Ordering::SeqCst) + 1
    }
}

impl Drop for QuickDiagnosisDebouncer {
    fn drop(&mut self) {
        self.cancel();
    }
}
