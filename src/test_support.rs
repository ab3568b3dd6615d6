// test_support.rs — 测试用的本地 HTTP 桩服务
// 监听 127.0.0.1 的随机端口，记录每个请求的目标路径，按处理函数返回固定响应

use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

/// 桩服务返回的响应
pub struct StubResponse {
    pub status: u16,
    pub content_type: &'static str,
    pub body: Vec<u8>,
    /// 覆盖 Content-Length，用来模拟连接中途断开
    pub declared_len: Option<usize>,
    /// 分块发送：每块字节数和块之间的停顿
    pub trickle: Option<(usize, Duration)>,
}

impl StubResponse {
    pub fn json(body: &str) -> Self {
        Self {
            status: 200,
            content_type: "application/json",
            body: body.as_bytes().to_vec(),
            declared_len: None,
            trickle: None,
        }
    }

    pub fn bytes(body: &[u8]) -> Self {
        Self {
            status: 200,
            content_type: "application/octet-stream",
            body: body.to_vec(),
            declared_len: None,
            trickle: None,
        }
    }

    pub fn status(status: u16) -> Self {
        Self {
            status,
            content_type: "text/plain",
            body: Vec::new(),
            declared_len: None,
            trickle: None,
        }
    }

    /// 声明的长度大于实际发送的字节数，发完后直接关闭连接
    pub fn truncated(self, declared_len: usize) -> Self {
        Self {
            declared_len: Some(declared_len),
            ..self
        }
    }

    /// 每次发送 `chunk` 字节，块之间停顿 `pause`
    pub fn trickle(self, chunk: usize, pause: Duration) -> Self {
        Self {
            trickle: Some((chunk, pause)),
            ..self
        }
    }
}

pub struct StubServer {
    pub base: String,
    requests: Arc<Mutex<Vec<String>>>,
}

impl StubServer {
    /// 启动桩服务，`handler` 接收请求目标（路径 + 查询串）
    pub async fn start<F>(handler: F) -> Self
    where
        F: Fn(&str) -> StubResponse + Send + Sync + 'static,
    {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let base = format!("http://{}", listener.local_addr().unwrap());
        let requests = Arc::new(Mutex::new(Vec::new()));
        let handler = Arc::new(handler);

        let recorded = Arc::clone(&requests);
        tokio::spawn(async move {
            loop {
                let Ok((mut stream, _)) = listener.accept().await else {
                    break;
                };
                let handler = Arc::clone(&handler);
                let recorded = Arc::clone(&recorded);

                tokio::spawn(async move {
                    let mut head = Vec::new();
                    let mut buf = [0u8; 1024];
                    while !head.windows(4).any(|w| w == b"\r\n\r\n") {
                        match stream.read(&mut buf).await {
                            Ok(0) | Err(_) => return,
                            Ok(n) => head.extend_from_slice(&buf[..n]),
                        }
                    }

                    let head = String::from_utf8_lossy(&head);
                    let target = head
                        .lines()
                        .next()
                        .and_then(|line| line.split_whitespace().nth(1))
                        .unwrap_or("/")
                        .to_string();
                    recorded.lock().unwrap().push(target.clone());

                    let response = handler(&target);
                    let header = format!(
                        "HTTP/1.1 {} Stub\r\nContent-Type: {}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
                        response.status,
                        response.content_type,
                        response.declared_len.unwrap_or(response.body.len())
                    );
                    let _ = stream.write_all(header.as_bytes()).await;
                    match response.trickle {
                        Some((chunk, pause)) => {
                            for (i, piece) in response.body.chunks(chunk.max(1)).enumerate() {
                                if i > 0 {
                                    tokio::time::sleep(pause).await;
                                }
                                if stream.write_all(piece).await.is_err() {
                                    return;
                                }
                                let _ = stream.flush().await;
                            }
                        }
                        None => {
                            let _ = stream.write_all(&response.body).await;
                        }
                    }
                    let _ = stream.shutdown().await;
                });
            }
        });

        Self { base, requests }
    }

    /// 目前为止收到的全部请求目标
    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }
}

/// 取出请求目标中某个查询参数的值
pub fn query_param(target: &str, key: &str) -> Option<String> {
    let url = url::Url::parse(&format!("http://stub{target}")).ok()?;
    url.query_pairs()
        .find(|(k, _)| k == key)
        .map(|(_, v)| v.into_owned())
}
