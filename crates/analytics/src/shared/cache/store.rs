use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Mutex;

/// Key-value подложка кэша (строка -> строка).
///
/// В оригинальной системе роль подложки играло браузерное localStorage
/// (глобальный синглтон); здесь хранилище внедряется явно, чтобы тесты
/// работали с памятью, а продакшен — с диском.
///
/// Все операции best-effort: ошибки ввода-вывода логируются и глотаются,
/// кэш никогда не является жёсткой зависимостью.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str);
    fn remove(&self, key: &str);
    /// Список всех ключей (для сервисной очистки просроченных записей)
    fn keys(&self) -> Vec<String>;
}

/// Хранилище в памяти — для тестов и эфемерного использования
#[derive(Default)]
pub struct MemoryStore {
    map: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.map.lock().ok()?.get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) {
        if let Ok(mut map) = self.map.lock() {
            map.insert(key.to_string(), value.to_string());
        }
    }

    fn remove(&self, key: &str) {
        if let Ok(mut map) = self.map.lock() {
            map.remove(key);
        }
    }

    fn keys(&self) -> Vec<String> {
        self.map
            .lock()
            .map(|map| map.keys().cloned().collect())
            .unwrap_or_default()
    }
}

/// Файловое хранилище: один JSON-файл на ключ в заданном каталоге.
///
/// Ключ используется как имя файла, поэтому должен состоять из символов,
/// безопасных для файловой системы — составные ключи кэша этому
/// удовлетворяют (префикс + логический ключ + id).
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", key))
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Option<String> {
        match std::fs::read_to_string(self.path_for(key)) {
            Ok(contents) => Some(contents),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => None,
            Err(e) => {
                tracing::warn!("Failed to read cache file for key {}: {}", key, e);
                None
            }
        }
    }

    fn set(&self, key: &str, value: &str) {
        if let Err(e) = std::fs::create_dir_all(&self.dir) {
            tracing::warn!("Failed to create cache dir {}: {}", self.dir.display(), e);
            return;
        }
        if let Err(e) = std::fs::write(self.path_for(key), value) {
            tracing::warn!("Failed to write cache file for key {}: {}", key, e);
        }
    }

    fn remove(&self, key: &str) {
        if let Err(e) = std::fs::remove_file(self.path_for(key)) {
            if e.kind() != std::io::ErrorKind::NotFound {
                tracing::warn!("Failed to remove cache file for key {}: {}", key, e);
            }
        }
    }

    fn keys(&self) -> Vec<String> {
        let entries = match std::fs::read_dir(&self.dir) {
            Ok(entries) => entries,
            Err(_) => return Vec::new(),
        };
        entries
            .filter_map(|entry| {
                let name = entry.ok()?.file_name().into_string().ok()?;
                name.strip_suffix(".json").map(|s| s.to_string())
            })
            .collect()
    }
}
