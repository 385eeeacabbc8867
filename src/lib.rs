// Базовые модули
pub mod config;
pub mod metrics;
pub mod record;
pub mod response;
pub mod util;

// Индекс (Manticore / in-memory)
pub mod index; // src/index/{mod,manticore,memory}.rs

// Маршрутизация и запросы к индексу
pub mod namespace;
pub mod pagination;
pub mod query;
pub mod route;
pub mod router;

// Gemtext-рендеринг
pub mod render; // src/render/{mod,text,listing,transaction}.rs

// Транспорт (Gemini over TLS)
pub mod server; // src/server/{mod,request,tls}.rs

// Удобные реэкспорты
pub use config::Config;
pub use index::{Index, ManticoreIndex, MemoryIndex, Order, Query};
pub use record::{checksum, Record, ALIAS_KEY};
pub use response::{Response, Status, MIME_GEMTEXT};
pub use route::Route;
pub use router::Context;
